//! Attendance aggregations shared by the two report commands.

pub mod overview;
pub mod statistics;

pub use overview::{OverviewOptions, OverviewRow, OverviewTable, aggregate_overviews};
pub use statistics::{GroupStatistics, SlotAggregate, StatisticsOptions, aggregate_statistics};
