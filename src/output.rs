//! Text rendering of reports and raw rows, plus JSON report logging.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzers::types::{
    DurationReport, StationReport, TimePatternReport, UserReport,
};
use crate::records::{Schema, TripRecord};

const SEPARATOR: &str = "----------------------------------------";
const MISSING: &str = "n/a";

/// Logs a report as JSON at debug level.
pub fn log_report(name: &str, report: &impl Serialize) {
    match serde_json::to_string(report) {
        Ok(json) => debug!(report = name, "{}", json),
        Err(e) => warn!(report = name, error = %e, "Failed to serialize report"),
    }
}

pub fn write_separator<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "{SEPARATOR}")
}

pub fn write_heading<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    writeln!(w, "\n{title}...\n")
}

pub fn write_elapsed<W: Write>(w: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(w, "\nThis took {:.6} seconds.", elapsed.as_secs_f64())?;
    write_separator(w)
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map_or_else(|| month.to_string(), |m| m.name().to_string())
}

pub fn write_time_report<W: Write>(w: &mut W, report: &TimePatternReport) -> io::Result<()> {
    writeln!(w, "The most common month: {}", or_missing(report.month.map(month_name)))?;
    writeln!(
        w,
        "The most common day of week: {}",
        or_missing(report.day_of_week.as_deref())
    )?;
    writeln!(
        w,
        "The most common start hour: {}",
        or_missing(report.hour.map(|h| format!("{h:02}:00")))
    )
}

pub fn write_station_report<W: Write>(w: &mut W, report: &StationReport) -> io::Result<()> {
    writeln!(
        w,
        "The most commonly used start station: {}",
        or_missing(report.start_station.as_deref())
    )?;
    writeln!(
        w,
        "The most commonly used end station: {}",
        or_missing(report.end_station.as_deref())
    )?;
    match &report.top_pair {
        Some(pair) => writeln!(
            w,
            "The most frequent trip: {} -> {} ({} trips)",
            pair.start, pair.end, pair.count
        ),
        None => writeln!(w, "The most frequent trip: {MISSING}"),
    }
}

pub fn write_duration_report<W: Write>(w: &mut W, report: &DurationReport) -> io::Result<()> {
    writeln!(
        w,
        "Total travel time: {} seconds or {:.4} years",
        report.total_seconds, report.total_years
    )?;
    writeln!(w, "Mean travel time: {:.2} seconds", report.mean_seconds)
}

fn write_counts<W: Write>(w: &mut W, counts: &[(String, usize)]) -> io::Result<()> {
    if counts.is_empty() {
        return writeln!(w, "  {MISSING}");
    }
    for (value, count) in counts {
        writeln!(w, "  {value}: {count}")?;
    }
    Ok(())
}

pub fn write_user_report<W: Write>(w: &mut W, report: &UserReport) -> io::Result<()> {
    writeln!(w, "Counts of user types:")?;
    write_counts(w, &report.user_types)?;

    if let Some(genders) = &report.genders {
        writeln!(w, "\nCounts of gender:")?;
        write_counts(w, genders)?;
    }

    if let Some(years) = &report.birth_years {
        writeln!(w, "\nThe earliest year of birth: {}", or_missing(years.earliest))?;
        writeln!(w, "The most recent year of birth: {}", or_missing(years.most_recent))?;
        writeln!(w, "The most common year of birth: {}", or_missing(years.most_common))?;
    }
    Ok(())
}

/// One line per trip. Gender and birth year appear only when the schema has them.
pub fn write_rows<W: Write>(w: &mut W, rows: &[TripRecord], schema: Schema) -> io::Result<()> {
    for r in rows {
        write!(
            w,
            "[{}] {} | {}s | {} -> {} | {}",
            r.row,
            r.start_time.format("%Y-%m-%d %H:%M:%S"),
            r.duration_secs,
            r.start_station,
            r.end_station,
            or_missing(r.user_type.as_deref()),
        )?;
        if schema.has_gender {
            write!(w, " | {}", or_missing(r.gender.as_deref()))?;
        }
        if schema.has_birth_year {
            write!(w, " | {}", or_missing(r.birth_year))?;
        }
        writeln!(w, " | {}, {}", month_name(r.month()), r.day_of_week())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{BirthYearStats, StationPair};
    use crate::records::read_trips;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_time_report_text() {
        let report = TimePatternReport {
            month: Some(6),
            day_of_week: Some("Monday".into()),
            hour: Some(17),
        };
        let text = render(|w| write_time_report(w, &report));

        assert!(text.contains("The most common month: June"));
        assert!(text.contains("The most common day of week: Monday"));
        assert!(text.contains("The most common start hour: 17:00"));
    }

    #[test]
    fn test_empty_time_report_shows_missing() {
        let report = TimePatternReport {
            month: None,
            day_of_week: None,
            hour: None,
        };
        let text = render(|w| write_time_report(w, &report));

        assert_eq!(text.matches(MISSING).count(), 3);
    }

    #[test]
    fn test_station_report_text() {
        let report = StationReport {
            start_station: Some("Clark St".into()),
            end_station: Some("Canal St".into()),
            top_pair: Some(StationPair {
                start: "Clark St".into(),
                end: "Canal St".into(),
                count: 4,
            }),
        };
        let text = render(|w| write_station_report(w, &report));

        assert!(text.contains("Clark St -> Canal St (4 trips)"));
    }

    #[test]
    fn test_duration_report_text() {
        let report = DurationReport {
            trip_count: 3,
            total_seconds: 360.0,
            mean_seconds: 120.0,
            total_years: 360.0 / 31_536_000.0,
        };
        let text = render(|w| write_duration_report(w, &report));

        assert!(text.contains("Total travel time: 360 seconds"));
        assert!(text.contains("Mean travel time: 120.00 seconds"));
    }

    #[test]
    fn test_user_report_skips_absent_sections() {
        let report = UserReport {
            user_types: vec![("Subscriber".into(), 2)],
            genders: None,
            birth_years: None,
        };
        let text = render(|w| write_user_report(w, &report));

        assert!(text.contains("  Subscriber: 2"));
        assert!(!text.contains("gender"));
        assert!(!text.contains("year of birth"));
    }

    #[test]
    fn test_user_report_with_demographics() {
        let report = UserReport {
            user_types: vec![("Subscriber".into(), 2)],
            genders: Some(vec![("Male".into(), 1), ("Female".into(), 1)]),
            birth_years: Some(BirthYearStats {
                earliest: Some(1950),
                most_recent: Some(2000),
                most_common: Some(1990),
            }),
        };
        let text = render(|w| write_user_report(w, &report));

        assert!(text.contains("Counts of gender:\n  Male: 1\n  Female: 1"));
        assert!(text.contains("The earliest year of birth: 1950"));
        assert!(text.contains("The most common year of birth: 1990"));
    }

    #[test]
    fn test_rows_follow_schema() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender
2017-06-23 15:09:32,321,Wood St,Damen Ave,Subscriber,
";
        let set = read_trips(csv.as_bytes()).unwrap();
        let text = render(|w| write_rows(w, set.records(), set.schema()));

        assert_eq!(
            text,
            "[0] 2017-06-23 15:09:32 | 321s | Wood St -> Damen Ave | Subscriber | n/a | June, Friday\n"
        );
    }

    #[test]
    fn test_log_report_does_not_panic() {
        log_report("duration", &DurationReport {
            trip_count: 0,
            total_seconds: 0.0,
            mean_seconds: 0.0,
            total_years: 0.0,
        });
    }
}
