use crate::analyzers::types::DurationReport;
use crate::analyzers::utility::mean;
use crate::records::RecordSet;

pub const SECONDS_PER_YEAR: f64 = 3600.0 * 24.0 * 365.0;

/// Total and mean trip duration. An empty set reports zeros.
pub fn duration_stats(records: &RecordSet) -> DurationReport {
    let durations: Vec<f64> = records.iter().map(|r| r.duration_secs).collect();
    let total_seconds: f64 = durations.iter().sum();

    DurationReport {
        trip_count: durations.len(),
        total_seconds,
        mean_seconds: mean(&durations),
        total_years: total_seconds / SECONDS_PER_YEAR,
    }
}
