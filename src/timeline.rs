// src/timeline.rs
use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate};

/// Calendar quarter of `date`, 1 through 4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Bucket label for the quarter containing `date`, e.g. `"2024 Q1"`.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{} Q{}", date.year(), quarter_of(date))
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1)
        .expect("first day of a quarter is a valid date")
}

/// Labels of every quarter from the one containing `start` through the one
/// containing `end`, inclusive. A reversed range yields the empty set rather
/// than walking forever.
pub fn quarter_labels_in_range(start: NaiveDate, end: NaiveDate) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();
    if start > end {
        return labels;
    }
    let mut cursor = quarter_start(start);
    while cursor <= end {
        labels.insert(quarter_label(cursor));
        cursor = match cursor.checked_add_months(Months::new(3)) {
            Some(next) => next,
            None => break,
        };
    }
    labels
}

/// Year labels covering `start.year()..=end.year()`.
pub fn year_labels_in_range(start: NaiveDate, end: NaiveDate) -> BTreeSet<String> {
    (start.year()..=end.year()).map(|year| year.to_string()).collect()
}

/// Whether `end` falls within the recorded-fare dataset. The quarterly chart
/// only overlays a predicted price across bars that actually exist.
pub fn overlaps_recorded_history(end: NaiveDate) -> bool {
    end <= history_cutoff()
}

// Last date covered by the recorded fares the service was trained on.
fn history_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).expect("fixed calendar date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_label_covers_all_four_quarters() {
        assert_eq!(quarter_label(date(2024, 1, 15)), "2024 Q1");
        assert_eq!(quarter_label(date(2024, 3, 31)), "2024 Q1");
        assert_eq!(quarter_label(date(2024, 4, 1)), "2024 Q2");
        assert_eq!(quarter_label(date(2024, 9, 30)), "2024 Q3");
        assert_eq!(quarter_label(date(2024, 12, 1)), "2024 Q4");
    }

    #[test]
    fn quarter_range_includes_both_endpoints() {
        let labels = quarter_labels_in_range(date(2023, 2, 10), date(2023, 11, 5));
        assert!(labels.contains("2023 Q1"));
        assert!(labels.contains("2023 Q4"));
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn quarter_range_within_one_quarter_is_a_single_label() {
        let labels = quarter_labels_in_range(date(2024, 4, 2), date(2024, 6, 28));
        assert_eq!(labels.into_iter().collect::<Vec<_>>(), vec!["2024 Q2".to_string()]);
    }

    #[test]
    fn quarter_range_crosses_year_boundaries() {
        let labels = quarter_labels_in_range(date(2022, 11, 20), date(2023, 2, 1));
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("2022 Q4"));
        assert!(labels.contains("2023 Q1"));
    }

    #[test]
    fn reversed_quarter_range_is_empty() {
        // Without the guard the quarter-start cursor could still land inside
        // the range and emit a label.
        assert!(quarter_labels_in_range(date(2024, 2, 15), date(2024, 1, 20)).is_empty());
    }

    #[test]
    fn year_labels_span_the_range_inclusive() {
        let labels = year_labels_in_range(date(2023, 1, 1), date(2024, 6, 1));
        assert_eq!(
            labels.into_iter().collect::<Vec<_>>(),
            vec!["2023".to_string(), "2024".to_string()]
        );
    }

    #[test]
    fn history_overlap_flips_after_the_cutoff() {
        assert!(overlaps_recorded_history(date(2024, 3, 31)));
        assert!(!overlaps_recorded_history(date(2024, 4, 1)));
    }
}
