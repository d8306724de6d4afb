// src/panels/prediction.rs
use log::{error, info};

use crate::models::{DateRange, PredictionOutcome, SpecialEvent};
use crate::services::error::{ServiceError, ServiceErrorKind};
use crate::timeline;

/// Fare-predictor state: the chosen event scenario and the outcome of the
/// latest request.
#[derive(Debug, Default)]
pub struct PredictionPanel {
    event: SpecialEvent,
    outcome: Option<PredictionOutcome>,
    loading: bool,
    error: Option<String>,
}

impl PredictionPanel {
    pub fn event(&self) -> SpecialEvent {
        self.event
    }

    pub fn set_event(&mut self, event: SpecialEvent) {
        self.event = event;
    }

    /// Clears the previous outcome before a new request goes out; results
    /// replace each other wholesale.
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.outcome = None;
        self.error = None;
    }

    pub fn finish_request(&mut self, result: Result<PredictionOutcome, ServiceError>) {
        self.loading = false;
        match result {
            Ok(outcome) => {
                info!("Predicted fare: {:.2}", outcome.predicted_price);
                self.outcome = Some(outcome);
                self.error = None;
            }
            Err(e) => match e.kind {
                // The service's own message is worth showing; anything below
                // the API surface collapses to a connectivity message.
                ServiceErrorKind::Api => {
                    self.error = Some(e.message);
                }
                ServiceErrorKind::Transport | ServiceErrorKind::Decode => {
                    error!("API error: {}", e);
                    self.error = Some("Failed to connect to the prediction service.".to_string());
                }
            },
        }
    }

    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        self.outcome.as_ref()
    }

    pub fn predicted_price(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.predicted_price)
    }

    pub fn actual_price(&self) -> Option<f64> {
        self.outcome.as_ref().and_then(|o| o.actual_price)
    }

    /// Price for the quarterly chart's overlay line. Only ranges that end
    /// within recorded history have bars for the line to sit over.
    pub fn overlay_price(&self, range: DateRange) -> Option<f64> {
        if timeline::overlaps_recorded_history(range.end) {
            self.predicted_price()
        } else {
            None
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
