pub mod analyzers;
pub mod browser;
pub mod city;
pub mod error;
pub mod filters;
pub mod output;
pub mod records;
pub mod session;
pub mod terminal;

pub use city::City;
pub use error::{ExplorerError, Result};
pub use records::{CsvDirectory, RecordSet, TripRecord, TripSource};
pub use session::Session;
