//! Report commands: statistics charts and daily overview documents.

pub mod overview;
pub mod statistics;

pub use overview::create_daily_overviews;
pub use statistics::create_statistics;
