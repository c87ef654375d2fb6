//! Calendar-day bucketing of forecast samples.
//!
//! Days are identified by their en-US long weekday name. Labels are not
//! unique beyond a week, which is fine because at most seven days are shown.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{HourlySeries, HourlySample};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLabel(String);

impl DayLabel {
    pub fn of(date: NaiveDate) -> Self {
        DayLabel(date.format("%A").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for DayLabel {
    fn from(value: &str) -> Self {
        DayLabel(value.to_string())
    }
}

impl From<String> for DayLabel {
    fn from(value: String) -> Self {
        DayLabel(value)
    }
}

impl PartialEq<str> for DayLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DayLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for DayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Long weekday label per date, in input order.
pub fn day_labels(dates: &[NaiveDate]) -> Vec<DayLabel> {
    dates.iter().map(|d| DayLabel::of(*d)).collect()
}

/// Hourly samples falling on the weekday named by `label`, in source order.
///
/// An empty label, or one that matches nothing, yields an empty list.
pub fn hourly_for_day(hourly: &HourlySeries, label: &str) -> Vec<HourlySample> {
    if label.is_empty() {
        return Vec::new();
    }

    hourly
        .iter()
        .filter(|sample| DayLabel::of(sample.timestamp.date()) == label)
        .collect()
}

/// "Mon", "Tue", ...
pub fn short_weekday(date: NaiveDate) -> String {
    date.weekday().to_string()
}

/// 12-hour clock label without minutes: "12 AM", "3 PM".
pub fn hour_label(ts: NaiveDateTime) -> String {
    ts.format("%-I %p").to_string()
}

/// "Sunday, Oct 19"
pub fn long_date(ts: NaiveDateTime) -> String {
    ts.format("%A, %b %-d").to_string()
}
