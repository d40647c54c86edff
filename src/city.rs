//! The fixed set of cities with trip data, and the file each one is read from.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ExplorerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed at the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// CSV file holding this city's trips, relative to the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            // the prompt offers "New York" as the short form
            "new york city" | "new york" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(ExplorerError::InvalidCitySelection(s.trim().to_string())),
        }
    }
}
