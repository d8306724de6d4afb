// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One airport pair with its popularity and fare metrics, as served by
/// `GET /api/routes`. Routes are undirected: (A,B) and (B,A) name the same
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRoute {
    pub from: String,
    pub to: String,
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_fare: Option<f64>,
}

impl FlightRoute {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Inclusive date range. Callers keep `start <= end`; the bucketing helpers
/// guard against reversed ranges but never repair them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

/// One bar of a fare series, labelled `"YYYY Qn"` or `"YYYY"`. The service
/// returns points in ascending time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroMetrics {
    #[serde(rename = "GDP")]
    pub gdp: f64,
    #[serde(rename = "oilPrice")]
    pub oil_price: f64,
    #[serde(rename = "unemploymentRate")]
    pub unemployment_rate: f64,
}

/// Event scenario fed to the fare predictor. Wire strings match the service's
/// dropdown values exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialEvent {
    #[default]
    None,
    Pandemic,
    Recession,
    #[serde(rename = "Foreign/Domestic Conflict")]
    ForeignDomesticConflict,
    #[serde(rename = "Natural Disaster")]
    NaturalDisaster,
}

impl SpecialEvent {
    pub const ALL: [SpecialEvent; 5] = [
        SpecialEvent::None,
        SpecialEvent::Pandemic,
        SpecialEvent::Recession,
        SpecialEvent::ForeignDomesticConflict,
        SpecialEvent::NaturalDisaster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialEvent::None => "None",
            SpecialEvent::Pandemic => "Pandemic",
            SpecialEvent::Recession => "Recession",
            SpecialEvent::ForeignDomesticConflict => "Foreign/Domestic Conflict",
            SpecialEvent::NaturalDisaster => "Natural Disaster",
        }
    }
}

impl std::fmt::Display for SpecialEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub departure: String,
    pub arrival: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub event: SpecialEvent,
}

/// Predictor result for one request. Replaced wholesale on every new request,
/// never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub predicted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<f64>,
}
