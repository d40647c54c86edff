//! Trip records and the CSV-backed store they are loaded from.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::city::City;
use crate::error::{ExplorerError, Result};
use crate::filters::weekday_name;

/// Formats accepted for the Start Time / End Time columns. `%.f` also matches
/// timestamps without a fractional part.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single row as it appears in a city CSV file.
///
/// Columns not listed here (such as the unnamed leading index column) are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// One bike-share trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// 0-based position of the row in its source file.
    pub row: usize,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_secs: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Month of the start time, 1 = January.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn weekday(&self) -> Weekday {
        self.start_time.weekday()
    }

    /// Full English weekday name of the start time, e.g. `"Monday"`.
    pub fn day_of_week(&self) -> &'static str {
        weekday_name(self.weekday())
    }

    /// Hour of the start time, 0–23.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Optional columns a source declares in its header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// Ordered trips sharing one [`Schema`], in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    schema: Schema,
    records: Vec<TripRecord>,
}

impl RecordSet {
    pub fn new(schema: Schema, records: Vec<TripRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    /// Rows `[start, start + len)`, clamped to the set. Past the end this is empty.
    pub fn page(&self, start: usize, len: usize) -> &[TripRecord] {
        let start = start.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        &self.records[start..end]
    }

    /// New set with the same schema holding the records that satisfy `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&TripRecord) -> bool) -> RecordSet {
        RecordSet {
            schema: self.schema,
            records: self.records.iter().filter(|r| keep(*r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Where trip records for a city come from.
pub trait TripSource {
    fn load(&self, city: City) -> Result<RecordSet>;
}

/// Reads `<dir>/<city file>.csv` for each city.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.dir.join(city.file_name())
    }
}

impl TripSource for CsvDirectory {
    #[tracing::instrument(skip_all, fields(city = %city))]
    fn load(&self, city: City) -> Result<RecordSet> {
        let path = self.path_for(city);
        debug!(path = %path.display(), "Opening trip data");

        let file = File::open(&path).map_err(|e| ExplorerError::SourceUnavailable {
            city: city.to_string(),
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let set = read_trips(file)?;
        info!(
            rows = set.len(),
            has_gender = set.schema().has_gender,
            has_birth_year = set.schema().has_birth_year,
            "Trip data loaded"
        );
        Ok(set)
    }
}

/// Parses every row of a trip CSV. The first bad row fails the whole read.
pub fn read_trips<R: Read>(reader: R) -> Result<RecordSet> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().map_err(malformed)?;
    let schema = Schema {
        has_gender: headers.iter().any(|h| h.trim() == "Gender"),
        has_birth_year: headers.iter().any(|h| h.trim() == "Birth Year"),
    };

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<RawTrip>().enumerate() {
        let raw = result.map_err(malformed)?;
        // header is line 1
        let line = row as u64 + 2;
        records.push(into_record(row, line, raw)?);
    }

    Ok(RecordSet::new(schema, records))
}

fn into_record(row: usize, line: u64, raw: RawTrip) -> Result<TripRecord> {
    let start_time = parse_timestamp(&raw.start_time).ok_or_else(|| {
        ExplorerError::InvalidTimestamp {
            line,
            value: raw.start_time.clone(),
        }
    })?;

    let end_time = match raw.end_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_timestamp(value).ok_or_else(|| {
            ExplorerError::InvalidTimestamp {
                line,
                value: value.to_string(),
            }
        })?),
    };

    Ok(TripRecord {
        row,
        start_time,
        end_time,
        duration_secs: raw.trip_duration,
        start_station: raw.start_station,
        end_station: raw.end_station,
        user_type: non_empty(raw.user_type),
        gender: non_empty(raw.gender),
        birth_year: raw
            .birth_year
            .filter(|y| y.is_finite())
            .map(|y| y.round() as i32),
    })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn malformed(err: csv::Error) -> ExplorerError {
    ExplorerError::MalformedRow {
        line: err.position().map(|p| p.line()),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const CHICAGO_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,,
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,,Female,1981.0
";

    const WASHINGTON_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_read_trips_parses_rows_in_order() {
        let set = read_trips(CHICAGO_SAMPLE.as_bytes()).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(
            set.schema(),
            Schema {
                has_gender: true,
                has_birth_year: true
            }
        );

        let first = &set.records()[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.duration_secs, 321.0);
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.month(), 6);
        assert_eq!(first.day_of_week(), "Friday");
        assert_eq!(first.hour(), 15);
        assert!(first.end_time.is_some());

        assert_eq!(set.records()[2].row, 2);
    }

    #[test]
    fn test_empty_cells_become_none() {
        let set = read_trips(CHICAGO_SAMPLE.as_bytes()).unwrap();

        assert_eq!(set.records()[1].gender, None);
        assert_eq!(set.records()[1].birth_year, None);
        assert_eq!(set.records()[2].user_type, None);
        assert_eq!(set.records()[2].gender.as_deref(), Some("Female"));
    }

    #[test]
    fn test_schema_without_optional_columns() {
        let set = read_trips(WASHINGTON_SAMPLE.as_bytes()).unwrap();

        assert_eq!(set.schema(), Schema::default());
        assert_eq!(set.records()[0].duration_secs, 489.066);
        assert_eq!(set.records()[0].gender, None);
    }

    #[test]
    fn test_unparseable_start_time_fails_load() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-01-01 00:00:01,60,A,B,Subscriber\n\
                   yesterday,60,A,B,Subscriber\n";
        let err = read_trips(csv.as_bytes()).unwrap_err();

        match err {
            ExplorerError::InvalidTimestamp { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_iso_timestamps_accepted() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-03-01T07:05:00,60,A,B,Subscriber\n";
        let set = read_trips(csv.as_bytes()).unwrap();

        assert_eq!(set.records()[0].hour(), 7);
        assert_eq!(set.records()[0].end_time, None);
    }

    #[test]
    fn test_bad_duration_is_malformed_row() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-03-01 07:05:00,long,A,B,Subscriber\n";
        let err = read_trips(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ExplorerError::MalformedRow { .. }));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let store = CsvDirectory::new(temp_path("bikeshare_explorer_no_such_dir"));
        let err = store.load(City::Chicago).unwrap_err();

        assert!(matches!(err, ExplorerError::SourceUnavailable { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_csv_directory_loads_city_file() {
        let dir = temp_path("bikeshare_explorer_store_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("washington.csv"), WASHINGTON_SAMPLE).unwrap();

        let store = CsvDirectory::new(&dir);
        let set = store.load(City::Washington).unwrap();
        assert_eq!(set.len(), 1);

        fs::remove_file(dir.join("washington.csv")).unwrap();
    }

    #[test]
    fn test_page_clamps_to_set() {
        let set = read_trips(CHICAGO_SAMPLE.as_bytes()).unwrap();

        assert_eq!(set.page(0, 5).len(), 3);
        assert_eq!(set.page(2, 5).len(), 1);
        assert!(set.page(10, 5).is_empty());
    }
}
