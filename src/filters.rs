//! Month and day-of-week filtering of a [`RecordSet`].

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::city::City;
use crate::error::{ExplorerError, Result};
use crate::records::RecordSet;

/// Months that can be filtered on. The source data only covers January–June.
pub const MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    All,
    /// 1-based month number, 1..=6.
    Month(u32),
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        if value == "all" {
            return Ok(MonthFilter::All);
        }
        MONTHS
            .iter()
            .position(|m| *m == value)
            .map(|idx| MonthFilter::Month(idx as u32 + 1))
            .ok_or_else(|| ExplorerError::InvalidMonth(s.trim().to_string()))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => f.write_str(MONTHS[*m as usize - 1]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayFilter {
    All,
    Day(#[serde(serialize_with = "serialize_weekday")] Weekday),
}

impl DayFilter {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == day,
        }
    }
}

impl FromStr for DayFilter {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .iter()
            .find(|d| weekday_name(**d).eq_ignore_ascii_case(value))
            .map(|d| DayFilter::Day(*d))
            .ok_or_else(|| ExplorerError::InvalidDay(value.to_string()))
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

fn serialize_weekday<S: serde::Serializer>(
    day: &Weekday,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// What the user asked to explore in one session iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// Filters by month and day given as user text (`"all"` disables a filter).
///
/// # Errors
///
/// [`ExplorerError::InvalidMonth`] or [`ExplorerError::InvalidDay`] when the
/// text is neither `"all"` nor a recognised name.
pub fn filter(records: &RecordSet, month: &str, day: &str) -> Result<RecordSet> {
    let month: MonthFilter = month.parse()?;
    let day: DayFilter = day.parse()?;
    Ok(apply(records, &month, &day))
}

/// Keeps records matching both filters, preserving order.
pub fn apply(records: &RecordSet, month: &MonthFilter, day: &DayFilter) -> RecordSet {
    let filtered = records.retain(|r| month.matches(r.month()) && day.matches(r.weekday()));
    debug!(
        month = %month,
        day = %day,
        before = records.len(),
        after = filtered.len(),
        "Filtered trips"
    );
    filtered
}
