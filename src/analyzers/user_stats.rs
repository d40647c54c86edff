use crate::analyzers::types::{BirthYearStats, UserReport};
use crate::analyzers::utility::{count_by, mode};
use crate::records::RecordSet;

/// Counts of user types and, where the source has them, genders and birth years.
///
/// Empty cells are not counted.
pub fn user_stats(records: &RecordSet) -> UserReport {
    let schema = records.schema();

    let user_types = count_by(records.iter().filter_map(|r| r.user_type.clone()));

    let genders = schema
        .has_gender
        .then(|| count_by(records.iter().filter_map(|r| r.gender.clone())));

    let birth_years = schema.has_birth_year.then(|| {
        let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
        BirthYearStats {
            earliest: years.iter().min().copied(),
            most_recent: years.iter().max().copied(),
            most_common: mode(years.iter().copied()),
        }
    });

    UserReport {
        user_types,
        genders,
        birth_years,
    }
}
