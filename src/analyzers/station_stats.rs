use crate::analyzers::types::{StationPair, StationReport};
use crate::analyzers::utility::{group_by, mode};
use crate::records::RecordSet;

/// Most used start station, end station and start/end combination.
pub fn station_stats(records: &RecordSet) -> StationReport {
    let start_station = mode(records.iter().map(|r| r.start_station.as_str())).map(str::to_string);
    let end_station = mode(records.iter().map(|r| r.end_station.as_str())).map(str::to_string);

    let groups = group_by(records, |r| (r.start_station.as_str(), r.end_station.as_str()));

    let mut top_pair: Option<StationPair> = None;
    for ((start, end), trips) in groups {
        // groups come in key order; only a strictly larger count replaces the leader
        if top_pair.as_ref().map_or(true, |p| trips.len() > p.count) {
            top_pair = Some(StationPair {
                start: start.to_string(),
                end: end.to_string(),
                count: trips.len(),
            });
        }
    }

    StationReport {
        start_station,
        end_station,
        top_pair,
    }
}
