//! Error types shared by the loader, filter stage and session.

use std::path::PathBuf;

/// Errors raised while exploring trip data.
///
/// The `Invalid*` selection variants are recoverable: the session prints
/// them and asks again. Everything else ends the session.
#[derive(thiserror::Error, Debug)]
pub enum ExplorerError {
    #[error("'{0}' is not one of: chicago, new york city, washington")]
    InvalidCitySelection(String),

    #[error("'{0}' is not a month filter; use all, january, february, march, april, may or june")]
    InvalidMonth(String),

    #[error("'{0}' is not a day filter; use all or a weekday name such as monday")]
    InvalidDay(String),

    #[error("trip data for {city} is unavailable at {}: {reason}", .path.display())]
    SourceUnavailable {
        city: String,
        path: PathBuf,
        reason: String,
    },

    #[error("unparseable timestamp '{value}' on line {line}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("malformed trip row{}: {reason}", .line.map(|l| format!(" on line {l}")).unwrap_or_default())]
    MalformedRow { line: Option<u64>, reason: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    /// Returns `true` for selection errors the session recovers from by re-prompting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExplorerError::InvalidCitySelection(_)
                | ExplorerError::InvalidMonth(_)
                | ExplorerError::InvalidDay(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
