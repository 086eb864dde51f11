use chrono::NaiveDate;

use crate::models::{ApplicationRecord, DailyCounts};

/// Reduces the record collection to applications per calendar date.
/// Records without a usable "Date Applied" value contribute nothing.
pub fn count_per_day(records: &[ApplicationRecord]) -> DailyCounts {
    let mut counts = DailyCounts::new();

    for record in records {
        let Some(raw) = record.date_applied() else {
            continue;
        };
        let Some(date) = normalize_date(raw) else {
            continue;
        };
        *counts.entry(date).or_insert(0) += 1;
    }

    counts
}

/// Normalizes an ISO date or date-time string to a calendar date, so that
/// applications logged at different times of day on the same date group
/// together. Time-of-day and timezone offset are discarded.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
