use crate::analyzers::types::TimePatternReport;
use crate::analyzers::utility::mode;
use crate::records::{RecordSet, TripRecord};

/// Most frequent month, day of week and start hour across `records`.
pub fn time_stats(records: &RecordSet) -> TimePatternReport {
    TimePatternReport {
        month: mode(records.iter().map(TripRecord::month)),
        day_of_week: mode(records.iter().map(TripRecord::day_of_week)).map(str::to_string),
        hour: mode(records.iter().map(TripRecord::hour)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::read_trips;

    #[test]
    fn test_time_stats() {
        // 2017-03-06 and 2017-03-13 were Mondays
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:10:00,60,A,B,Subscriber
2017-03-13 08:20:00,60,A,B,Subscriber
2017-04-01 17:00:00,60,A,B,Subscriber
";
        let report = time_stats(&read_trips(csv.as_bytes()).unwrap());

        assert_eq!(report.month, Some(3));
        assert_eq!(report.day_of_week.as_deref(), Some("Monday"));
        assert_eq!(report.hour, Some(8));
    }

    #[test]
    fn test_time_stats_tie_breaks_low() {
        // Saturday 2017-04-01 vs Friday 2017-05-05: one each
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-05-05 18:00:00,60,A,B,Subscriber
2017-04-01 09:00:00,60,A,B,Subscriber
";
        let report = time_stats(&read_trips(csv.as_bytes()).unwrap());

        assert_eq!(report.month, Some(4));
        assert_eq!(report.day_of_week.as_deref(), Some("Friday"));
        assert_eq!(report.hour, Some(9));
    }

    #[test]
    fn test_time_stats_empty_has_no_mode() {
        let report = time_stats(&RecordSet::default());
        assert_eq!(
            report,
            TimePatternReport {
                month: None,
                day_of_week: None,
                hour: None
            }
        );
    }
}
