// src/services/client.rs
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::env;

use super::error::ServiceError;
use crate::models::{FlightRoute, MacroMetrics, PredictionOutcome, PredictionRequest, TimeSeriesPoint};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Thin adapter over the external prediction/analytics service. One client is
/// shared by every panel; each call is a single request with no retry.
#[derive(Debug, Clone)]
pub struct FareServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl FareServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        FareServiceClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("FARE_SERVICE_URL").unwrap_or_else(|_| {
            warn!("$FARE_SERVICE_URL not set, defaulting to {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn routes(&self) -> Result<Vec<FlightRoute>> {
        let url = format!("{}/api/routes", self.base_url);
        info!("Fetching route list from {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        decode_response(response).await
    }

    pub async fn quarterly_fares(&self, departure: &str, arrival: &str) -> Result<Vec<TimeSeriesPoint>> {
        self.fares("quarterly-fares", departure, arrival).await
    }

    pub async fn yearly_fares(&self, departure: &str, arrival: &str) -> Result<Vec<TimeSeriesPoint>> {
        self.fares("yearly-fares", departure, arrival).await
    }

    async fn fares(&self, endpoint: &str, departure: &str, arrival: &str) -> Result<Vec<TimeSeriesPoint>> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        debug!("Requesting {} for {} -> {}", endpoint, departure, arrival);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "departure": departure, "arrival": arrival }))
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        decode_response(response).await
    }

    pub async fn macro_metrics(&self, date: NaiveDate) -> Result<MacroMetrics> {
        let url = format!("{}/api/macro-metrics", self.base_url);
        debug!("Requesting macro metrics for {}", date);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "date": date.format("%Y-%m-%d").to_string() }))
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        decode_response(response).await
    }

    /// The predictor reports model-side failures through an `error` field,
    /// sometimes on a 2xx response, so its body gets inspected before the
    /// status decides anything.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutcome> {
        let url = format!("{}/api/predict", self.base_url);
        info!(
            "Requesting fare prediction for {} -> {} ({})",
            request.departure, request.arrival, request.event
        );
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        if status.is_success() {
            if let Ok(outcome) = serde_json::from_str::<PredictionOutcome>(&body) {
                return Ok(outcome);
            }
        }
        let message = error_message(&body)
            .unwrap_or_else(|| "An unexpected error occurred.".to_string());
        error!("Prediction request failed ({}): {}", status, message);
        Err(ServiceError::api(message))
    }
}

/// Non-2xx responses surface the `{error}` body message when the service
/// provides one; 2xx bodies that fail to parse are decode failures.
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::transport(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&body)
            .unwrap_or_else(|| format!("Service responded with status {}", status));
        error!("Service error ({}): {}", status, message);
        return Err(ServiceError::api(message));
    }

    serde_json::from_str(&body).map_err(|e| {
        error!("Failed to decode service payload: {}", e);
        ServiceError::decode(e.to_string())
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_the_error_field() {
        assert_eq!(
            error_message(r#"{"error":"Unknown route"}"#),
            Some("Unknown route".to_string())
        );
        assert_eq!(error_message(r#"{"rate":3.2}"#), None);
        assert_eq!(error_message("not json"), None);
    }
}
