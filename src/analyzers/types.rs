//! Report types produced by the aggregators.

use serde::Serialize;

/// Most common month, weekday and start hour. `None` when there were no trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePatternReport {
    pub month: Option<u32>,
    pub day_of_week: Option<String>,
    pub hour: Option<u32>,
}

/// A start/end station combination and how many trips used it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
    pub count: usize,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationReport {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub top_pair: Option<StationPair>,
}

/// Total and mean trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    pub trip_count: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    /// `total_seconds` over a 365-day year.
    pub total_years: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: Option<i32>,
    pub most_recent: Option<i32>,
    pub most_common: Option<i32>,
}

/// Rider breakdown. Gender and birth-year sections are `None` when the
/// source has no such column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReport {
    pub user_types: Vec<(String, usize)>,
    pub genders: Option<Vec<(String, usize)>>,
    pub birth_years: Option<BirthYearStats>,
}
