//! Descriptive statistics over a filtered [`RecordSet`](crate::records::RecordSet).
//!
//! Each aggregator is a pure function returning a serializable report; they
//! share the counting helpers in [`utility`].

pub mod duration_stats;
pub mod station_stats;
pub mod time_stats;
pub mod types;
pub mod user_stats;
pub mod utility;

pub use duration_stats::duration_stats;
pub use station_stats::station_stats;
pub use time_stats::time_stats;
pub use user_stats::user_stats;
