// src/panels/macro_metrics.rs
use chrono::{Months, NaiveDate, Utc};
use log::{error, info};

use crate::models::MacroMetrics;
use crate::services::error::ServiceError;

/// Macro indicators (GDP, oil price, unemployment) for the selected range's
/// start date. A start date more than six months out has no published data
/// yet; the panel flags that and skips the fetch instead of failing.
#[derive(Debug, Default)]
pub struct MacroMetricsPanel {
    metrics: Option<MacroMetrics>,
    loading: bool,
    error: Option<String>,
    too_far_in_future: bool,
}

impl MacroMetricsPanel {
    /// Returns false when `date` is beyond the data horizon and no fetch
    /// should be issued.
    pub fn begin_refresh(&mut self, date: NaiveDate) -> bool {
        if beyond_data_horizon(date) {
            info!("Macro metrics unavailable for {}: beyond the data horizon", date);
            self.too_far_in_future = true;
            self.metrics = None;
            self.loading = false;
            self.error = None;
            return false;
        }
        self.too_far_in_future = false;
        self.loading = true;
        true
    }

    pub fn finish_refresh(&mut self, result: Result<MacroMetrics, ServiceError>) {
        self.loading = false;
        match result {
            Ok(metrics) => {
                self.metrics = Some(metrics);
                self.error = None;
            }
            Err(e) => {
                error!("Macro fetch error: {}", e);
                self.metrics = None;
                self.error = Some("Failed to load macro metrics.".to_string());
            }
        }
    }

    pub fn metrics(&self) -> Option<&MacroMetrics> {
        self.metrics.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn too_far_in_future(&self) -> bool {
        self.too_far_in_future
    }
}

fn beyond_data_horizon(date: NaiveDate) -> bool {
    let today = Utc::now().date_naive();
    match today.checked_add_months(Months::new(6)) {
        Some(horizon) => date > horizon,
        None => false,
    }
}
