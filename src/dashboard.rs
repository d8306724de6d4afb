// src/dashboard.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use regex::Regex;

use crate::models::{
    DateRange, FlightRoute, MacroMetrics, PredictionOutcome, PredictionRequest, TimeSeriesPoint,
};
use crate::panels::flight_map::FlightMapPanel;
use crate::panels::macro_metrics::MacroMetricsPanel;
use crate::panels::prediction::PredictionPanel;
use crate::panels::trends::{Granularity, TrendsPanel};
use crate::services::airports::AirportDirectory;
use crate::services::client::FareServiceClient;
use crate::services::error::ServiceError;

/// Departure/arrival pair as bare airport codes. Complete only when both are
/// set and distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSelection {
    pub departure: Option<String>,
    pub arrival: Option<String>,
}

impl RouteSelection {
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.departure.as_deref(), self.arrival.as_deref()) {
            (Some(departure), Some(arrival)) if departure != arrival => Some((departure, arrival)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }
}

/// Dropdown options render as `"SFO (San Francisco)"`; the code is split back
/// off the front when a label comes in whole.
pub fn selection_label(code: &str, name: &str) -> String {
    format!("{} ({})", code, name)
}

/// The airport code at the front of a selection label, if the label carries
/// one.
pub fn code_from_label(label: &str) -> Option<String> {
    let pattern = Regex::new(r"^([A-Z]{3})\b").ok()?;
    pattern.captures(label).map(|captures| captures[1].to_string())
}

/// Identity of one derived query: the trend and prediction panels re-fetch
/// exactly when this key changes. Responses are applied only while the key
/// they were issued under is still current, so a slow stale response can
/// never overwrite a newer selection's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    pub departure: String,
    pub arrival: String,
    pub range: DateRange,
}

/// The whole dashboard's view state in one value: selection, date range, and
/// every panel. Panels never talk to each other; they share state only
/// through this aggregate.
pub struct Dashboard {
    airports: Arc<AirportDirectory>,
    selection: RouteSelection,
    date_range: DateRange,
    pub flight_map: FlightMapPanel,
    pub quarterly: TrendsPanel,
    pub yearly: TrendsPanel,
    pub macro_metrics: MacroMetricsPanel,
    pub prediction: PredictionPanel,
}

impl Dashboard {
    pub fn new(airports: Arc<AirportDirectory>, date_range: DateRange) -> Self {
        Dashboard {
            airports,
            selection: RouteSelection::default(),
            date_range,
            flight_map: FlightMapPanel::default(),
            quarterly: TrendsPanel::new(Granularity::Quarterly),
            yearly: TrendsPanel::new(Granularity::Yearly),
            macro_metrics: MacroMetricsPanel::default(),
            prediction: PredictionPanel::default(),
        }
    }

    pub fn airports(&self) -> &AirportDirectory {
        &self.airports
    }

    pub fn selection(&self) -> &RouteSelection {
        &self.selection
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn set_departure(&mut self, code: Option<String>) {
        debug!("Departure changed to {:?}", code);
        self.selection.departure = code;
        // An arrival the new departure cannot reach is stale. Reachability is
        // only known once the route list has loaded.
        if let (Some(departure), Some(arrival)) =
            (self.selection.departure.as_deref(), self.selection.arrival.as_deref())
        {
            let index = self.flight_map.index();
            if !index.is_empty() && !index.destinations_from(departure).contains(arrival) {
                debug!("Clearing arrival {}: unreachable from {}", arrival, departure);
                self.selection.arrival = None;
            }
        }
    }

    pub fn set_arrival(&mut self, code: Option<String>) {
        debug!("Arrival changed to {:?}", code);
        self.selection.arrival = code;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        debug!("Date range changed to {} .. {}", range.start, range.end);
        self.date_range = range;
    }

    pub fn clear_selection(&mut self) {
        self.selection = RouteSelection::default();
    }

    /// Map-click behavior: clicking the already-selected route clears the
    /// selection, any other route selects it.
    pub fn toggle_route(&mut self, from: &str, to: &str) {
        let already_selected = match self.selection.pair() {
            Some((departure, arrival)) => {
                (departure == from && arrival == to) || (departure == to && arrival == from)
            }
            None => false,
        };
        if already_selected {
            self.clear_selection();
        } else {
            self.selection.departure = Some(from.to_string());
            self.selection.arrival = Some(to.to_string());
        }
    }

    /// Arrival-dropdown options for the current departure.
    pub fn available_destinations(&self) -> BTreeSet<String> {
        match self.selection.departure.as_deref() {
            Some(departure) => self.flight_map.index().destinations_from(departure),
            None => BTreeSet::new(),
        }
    }

    /// The route record backing the current selection, for the passenger and
    /// fare readouts.
    pub fn selected_route(&self) -> Option<&FlightRoute> {
        let (departure, arrival) = self.selection.pair()?;
        self.flight_map.index().find_route(departure, arrival)
    }

    pub fn query_key(&self) -> Option<QueryKey> {
        let (departure, arrival) = self.selection.pair()?;
        Some(QueryKey {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            range: self.date_range,
        })
    }

    pub fn prediction_request(&self) -> Option<PredictionRequest> {
        let key = self.query_key()?;
        Some(PredictionRequest {
            departure: key.departure,
            arrival: key.arrival,
            start_date: key.range.start,
            end_date: key.range.end,
            event: self.prediction.event(),
        })
    }

    pub async fn load_routes(&mut self, client: &FareServiceClient) {
        self.flight_map.begin_load();
        let result = client.routes().await;
        self.flight_map.finish_load(result);
    }

    /// Apply a quarterly-fares response issued under `key`, dropping it when
    /// the key is no longer current.
    pub fn apply_quarterly(&mut self, key: &QueryKey, result: Result<Vec<TimeSeriesPoint>, ServiceError>) {
        if self.query_key().as_ref() != Some(key) {
            debug!(
                "Dropping stale quarterly-fares response for {} -> {}",
                key.departure, key.arrival
            );
            return;
        }
        self.quarterly.finish_refresh(result, key.range);
    }

    pub fn apply_yearly(&mut self, key: &QueryKey, result: Result<Vec<TimeSeriesPoint>, ServiceError>) {
        if self.query_key().as_ref() != Some(key) {
            debug!(
                "Dropping stale yearly-fares response for {} -> {}",
                key.departure, key.arrival
            );
            return;
        }
        self.yearly.finish_refresh(result, key.range);
    }

    /// Apply a macro-metrics response issued for `date` (the range start at
    /// issue time), dropping it when the range has moved on.
    pub fn apply_macro(&mut self, date: NaiveDate, result: Result<MacroMetrics, ServiceError>) {
        if self.date_range.start != date {
            debug!("Dropping stale macro-metrics response for {}", date);
            return;
        }
        self.macro_metrics.finish_refresh(result);
    }

    pub fn apply_prediction(&mut self, key: &QueryKey, result: Result<PredictionOutcome, ServiceError>) {
        if self.query_key().as_ref() != Some(key) {
            debug!(
                "Dropping stale prediction response for {} -> {}",
                key.departure, key.arrival
            );
            return;
        }
        self.prediction.finish_request(result);
    }

    /// One full derivation pass: load the route list on first use, then
    /// refresh every panel whose query is currently satisfiable.
    pub async fn refresh(&mut self, client: &FareServiceClient) {
        if self.flight_map.index().is_empty() && self.flight_map.error().is_none() {
            self.load_routes(client).await;
        }

        if let Some(key) = self.query_key() {
            self.quarterly.begin_refresh();
            let result = client.quarterly_fares(&key.departure, &key.arrival).await;
            self.apply_quarterly(&key, result);

            self.yearly.begin_refresh();
            let result = client.yearly_fares(&key.departure, &key.arrival).await;
            self.apply_yearly(&key, result);
        }

        self.refresh_macro(client).await;
    }

    pub async fn refresh_macro(&mut self, client: &FareServiceClient) {
        let date = self.date_range.start;
        if !self.macro_metrics.begin_refresh(date) {
            return;
        }
        let result = client.macro_metrics(date).await;
        self.apply_macro(date, result);
    }

    /// Fire one prediction request for the current selection and event.
    pub async fn request_prediction(&mut self, client: &FareServiceClient) {
        let request = match self.prediction_request() {
            Some(request) => request,
            None => return,
        };
        let key = match self.query_key() {
            Some(key) => key,
            None => return,
        };
        self.prediction.begin_request();
        let result = client.predict(&request).await;
        self.apply_prediction(&key, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeriesPoint;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn route(from: &str, to: &str, popularity: f64) -> FlightRoute {
        FlightRoute {
            from: from.to_string(),
            to: to.to_string(),
            popularity,
            passenger_count: Some(1000),
            average_fare: Some(250.0),
        }
    }

    fn dashboard_with_routes() -> Dashboard {
        let airports = Arc::new(AirportDirectory::bundled().unwrap());
        let range = DateRange::new(date(2023, 6, 10), date(2023, 6, 17));
        let mut dashboard = Dashboard::new(airports, range);
        dashboard.flight_map.begin_load();
        dashboard.flight_map.finish_load(Ok(vec![
            route("SFO", "LGA", 90.0),
            route("JFK", "SFO", 75.0),
            route("SEA", "DEN", 30.0),
        ]));
        dashboard
    }

    fn series(labels: &[&str]) -> Vec<TimeSeriesPoint> {
        labels
            .iter()
            .map(|label| TimeSeriesPoint { label: label.to_string(), value: 200.0 })
            .collect()
    }

    #[test]
    fn selection_labels_round_trip() {
        let label = selection_label("SFO", "San Francisco");
        assert_eq!(label, "SFO (San Francisco)");
        assert_eq!(code_from_label(&label), Some("SFO".to_string()));
        assert_eq!(code_from_label("Select departure"), None);
    }

    #[test]
    fn query_key_requires_a_complete_selection() {
        let mut dashboard = dashboard_with_routes();
        assert!(dashboard.query_key().is_none());

        dashboard.set_departure(Some("SFO".to_string()));
        assert!(dashboard.query_key().is_none());

        dashboard.set_arrival(Some("LGA".to_string()));
        let key = dashboard.query_key().unwrap();
        assert_eq!(key.departure, "SFO");
        assert_eq!(key.arrival, "LGA");

        // Same code on both ends is not a route.
        dashboard.set_arrival(Some("SFO".to_string()));
        assert!(dashboard.query_key().is_none());
    }

    #[test]
    fn changing_departure_clears_unreachable_arrival() {
        let mut dashboard = dashboard_with_routes();
        dashboard.set_departure(Some("SFO".to_string()));
        dashboard.set_arrival(Some("LGA".to_string()));

        dashboard.set_departure(Some("SEA".to_string()));
        assert_eq!(dashboard.selection().arrival, None);

        // A reachable arrival survives the change.
        dashboard.set_departure(Some("SFO".to_string()));
        dashboard.set_arrival(Some("JFK".to_string()));
        dashboard.set_departure(Some("SFO".to_string()));
        assert_eq!(dashboard.selection().arrival.as_deref(), Some("JFK"));
    }

    #[test]
    fn toggle_route_selects_and_unselects() {
        let mut dashboard = dashboard_with_routes();
        dashboard.toggle_route("SFO", "LGA");
        assert!(dashboard.selection().is_complete());
        assert_eq!(dashboard.selected_route().map(|r| r.popularity), Some(90.0));

        // Clicking the same route again, listed in the other direction,
        // clears the selection.
        dashboard.toggle_route("LGA", "SFO");
        assert!(!dashboard.selection().is_complete());
    }

    #[test]
    fn available_destinations_follow_the_departure() {
        let mut dashboard = dashboard_with_routes();
        assert!(dashboard.available_destinations().is_empty());

        dashboard.set_departure(Some("SFO".to_string()));
        let destinations = dashboard.available_destinations();
        assert_eq!(
            destinations.into_iter().collect::<Vec<_>>(),
            vec!["JFK".to_string(), "LGA".to_string()]
        );
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut dashboard = dashboard_with_routes();
        dashboard.set_departure(Some("SFO".to_string()));
        dashboard.set_arrival(Some("LGA".to_string()));
        let old_key = dashboard.query_key().unwrap();

        // The user moves on before the response lands.
        dashboard.set_arrival(Some("JFK".to_string()));
        dashboard.apply_quarterly(&old_key, Ok(series(&["2023 Q1", "2023 Q2"])));
        assert!(dashboard.quarterly.data().is_empty());

        // The response for the current key applies.
        let key = dashboard.query_key().unwrap();
        dashboard.apply_quarterly(&key, Ok(series(&["2023 Q1", "2023 Q2"])));
        assert_eq!(dashboard.quarterly.data().len(), 2);
    }

    #[test]
    fn stale_macro_response_is_dropped_after_range_change() {
        let mut dashboard = dashboard_with_routes();
        let issued_for = dashboard.date_range().start;

        dashboard.set_date_range(DateRange::new(date(2024, 1, 1), date(2024, 1, 8)));
        dashboard.apply_macro(
            issued_for,
            Ok(MacroMetrics { gdp: 1.0, oil_price: 2.0, unemployment_rate: 3.0 }),
        );
        assert!(dashboard.macro_metrics.metrics().is_none());
    }
}
