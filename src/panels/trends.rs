// src/panels/trends.rs
use std::collections::BTreeSet;

use log::error;

use crate::models::{DateRange, TimeSeriesPoint};
use crate::paging;
use crate::services::error::ServiceError;
use crate::timeline;

/// Bucket width of a trends chart. Fixes the label shape and how many bars
/// fit on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Quarterly,
    Yearly,
}

impl Granularity {
    pub fn bars_per_page(self) -> usize {
        match self {
            Granularity::Quarterly => 12,
            Granularity::Yearly => 6,
        }
    }

    pub fn labels_in_range(self, range: DateRange) -> BTreeSet<String> {
        match self {
            Granularity::Quarterly => timeline::quarter_labels_in_range(range.start, range.end),
            Granularity::Yearly => timeline::year_labels_in_range(range.start, range.end),
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Granularity::Quarterly => "quarterly-fares",
            Granularity::Yearly => "yearly-fares",
        }
    }
}

/// One bar-chart panel: the fare series, the page being shown, and which bars
/// fall inside the selected date range. Instantiated twice, quarterly and
/// yearly.
#[derive(Debug)]
pub struct TrendsPanel {
    granularity: Granularity,
    data: Vec<TimeSeriesPoint>,
    selected_labels: BTreeSet<String>,
    loading: bool,
    error: Option<String>,
    page: usize,
}

impl TrendsPanel {
    pub fn new(granularity: Granularity) -> Self {
        TrendsPanel {
            granularity,
            data: Vec::new(),
            selected_labels: BTreeSet::new(),
            loading: false,
            error: None,
            page: 0,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Store a fresh series (or its failure) fetched for `range`. Fresh data
    /// auto-scrolls to the page holding the first bar inside the range; a
    /// failure clears the previously displayed series.
    pub fn finish_refresh(
        &mut self,
        result: Result<Vec<TimeSeriesPoint>, ServiceError>,
        range: DateRange,
    ) {
        self.loading = false;
        let labels = self.granularity.labels_in_range(range);
        match result {
            Ok(data) => {
                let bars = self.granularity.bars_per_page();
                self.page = paging::page_containing(&data, bars, |point| labels.contains(&point.label));
                self.data = data;
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching {}: {}", self.granularity.endpoint(), e);
                self.data.clear();
                self.page = 0;
                self.error = Some("Failed to load data.".to_string());
            }
        }
        self.selected_labels = labels;
    }

    pub fn next_page(&mut self) {
        self.page = paging::clamp_next(self.page, self.granularity.bars_per_page(), self.data.len());
    }

    pub fn prev_page(&mut self) {
        self.page = paging::clamp_prev(self.page);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// The bars on the current page.
    pub fn current_bars(&self) -> &[TimeSeriesPoint] {
        paging::page(&self.data, self.granularity.bars_per_page(), self.page)
    }

    /// Whether a bar falls inside the selected date range.
    pub fn is_highlighted(&self, point: &TimeSeriesPoint) -> bool {
        self.selected_labels.contains(&point.label)
    }

    /// Scale denominator for bar heights; floors at 1 so an empty or all-zero
    /// series never divides by zero.
    pub fn max_value(&self) -> f64 {
        self.data.iter().map(|point| point.value).fold(1.0, f64::max)
    }

    pub fn data(&self) -> &[TimeSeriesPoint] {
        &self.data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
