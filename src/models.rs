use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Deserialize;

/// One page record from the applications database. Every property the
/// database holds comes back on the wire, but only "Date Applied" is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl ApplicationRecord {
    /// Raw "Date Applied" start value, if the record carries one.
    pub fn date_applied(&self) -> Option<&str> {
        self.properties
            .get("Date Applied")?
            .date
            .as_ref()?
            .start
            .as_deref()
    }
}

/// A property value as returned by the API. Properties of other kinds
/// (title, select, ...) deserialize with `date: None` and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub date: Option<DateValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
}

/// Applications per calendar date. Dates with no applications are absent;
/// the renderer fills gaps with zero.
pub type DailyCounts = BTreeMap<NaiveDate, u64>;

/// A 7-row by `weeks`-column calendar grid. Row index is the weekday
/// (Monday = 0), column index is the day offset from the window start
/// divided by 7. Cells outside the trailing window keep their defaults.
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    pub weeks: usize,
    /// Counts clamped to the color-scale cap.
    pub z: Vec<Vec<u64>>,
    /// Hover labels carrying the true, unclamped count.
    pub hover: Vec<Vec<Option<String>>>,
}

impl HeatmapGrid {
    pub fn empty(weeks: usize) -> Self {
        Self {
            weeks,
            z: vec![vec![0; weeks]; 7],
            hover: vec![vec![None; weeks]; 7],
        }
    }
}
