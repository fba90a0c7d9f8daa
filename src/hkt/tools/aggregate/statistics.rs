use serde::Serialize;

use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::model::{
    AttendanceCell, AttendanceTable, HalfDay, NotApplicablePolicy, Slot, Weekday,
};
use crate::hkt::tools::partition::{GroupPartition, for_day, partition_by_group};

/// Home / not-home counts of one half-day slot within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAggregate {
    pub slot: Slot,
    pub home_count: usize,
    pub not_home_count: usize,
}

impl SlotAggregate {
    /// Chart label of the bucket, e.g. `Monday morning`.
    pub fn label(&self) -> String {
        self.slot.column_name()
    }
}

/// The ten statistics buckets of one group, in [`Slot::week`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatistics {
    pub group: String,
    pub row_count: usize,
    pub buckets: Vec<SlotAggregate>,
}

/// Knobs for the statistics aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsOptions {
    /// Whether empty cells count towards `not_home_count`.
    pub not_applicable: NotApplicablePolicy,
}

/// Aggregates every group of the table.
pub fn aggregate_statistics(
    table: &AttendanceTable,
    options: StatisticsOptions,
) -> Result<Vec<GroupStatistics>> {
    partition_by_group(table)
        .iter()
        .map(|partition| aggregate_group(partition, options))
        .collect()
}

/// Computes the ten buckets of a single group.
///
/// `home_count` is the number of "stays at home" cells in the slot's column.
/// Numbers other than the two sentinels weigh nothing. With
/// [`NotApplicablePolicy::CountAsDaycare`] every other row of the group,
/// empty cells included, is counted as not at home; with
/// [`NotApplicablePolicy::Exclude`] only explicit "comes to daycare" cells
/// are.
pub fn aggregate_group(
    partition: &GroupPartition<'_>,
    options: StatisticsOptions,
) -> Result<GroupStatistics> {
    let row_count = partition.len();
    let mut buckets = Vec::with_capacity(Weekday::ALL.len() * HalfDay::ALL.len());

    for weekday in Weekday::ALL {
        let day = for_day(partition, weekday);
        for half_day in HalfDay::ALL {
            let slot = Slot::new(weekday, half_day);
            let mut home_count = 0;
            let mut daycare_count = 0;

            for (cell, row) in day.column(half_day).iter().zip(&partition.rows) {
                match AttendanceCell::from_value(cell) {
                    Some(AttendanceCell::StaysHome) => home_count += 1,
                    Some(AttendanceCell::ComesToDaycare) => daycare_count += 1,
                    Some(AttendanceCell::NotApplicable | AttendanceCell::Unmarked) => {}
                    None => {
                        return Err(ToolError::InvalidCell {
                            row: row.line,
                            column: slot.column_name(),
                            value: cell.to_string(),
                        });
                    }
                }
            }

            let not_home_count = match options.not_applicable {
                NotApplicablePolicy::CountAsDaycare => row_count - home_count,
                NotApplicablePolicy::Exclude => daycare_count,
            };
            buckets.push(SlotAggregate {
                slot,
                home_count,
                not_home_count,
            });
        }
    }

    Ok(GroupStatistics {
        group: partition.key.clone(),
        row_count,
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hkt::tools::model::{AttendanceRow, CellValue};

    fn child(line: usize, group: &str, slots: Vec<CellValue>) -> AttendanceRow {
        AttendanceRow {
            line,
            name: CellValue::Text(format!("child {line}")),
            group: CellValue::Text(group.into()),
            slots,
            assigned: CellValue::Empty,
            comments: CellValue::Empty,
        }
    }

    fn empty_week() -> Vec<CellValue> {
        vec![CellValue::Empty; 10]
    }

    #[test]
    fn single_home_cell_scenario() {
        let mut slots = empty_week();
        slots[0] = CellValue::Number(1.0);
        let table = AttendanceTable::new(vec![child(2, "A", slots), child(3, "A", empty_week())]);

        let stats = aggregate_statistics(&table, StatisticsOptions::default()).expect("aggregated");

        assert_eq!(stats.len(), 1);
        let buckets = &stats[0].buckets;
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0].label(), "Monday morning");
        assert_eq!((buckets[0].home_count, buckets[0].not_home_count), (1, 1));
        for bucket in &buckets[1..] {
            assert_eq!((bucket.home_count, bucket.not_home_count), (0, 2));
        }
    }

    #[test]
    fn bucket_totals_equal_ten_times_rows_by_default() {
        let mut first = empty_week();
        first[3] = CellValue::Number(1.0);
        first[4] = CellValue::Number(-1.0);
        let mut second = empty_week();
        second[3] = CellValue::Number(1.0);
        let table = AttendanceTable::new(vec![
            child(2, "A", first),
            child(3, "A", second),
            child(4, "B", empty_week()),
        ]);

        let stats = aggregate_statistics(&table, StatisticsOptions::default()).expect("aggregated");

        for group in &stats {
            let total: usize = group
                .buckets
                .iter()
                .map(|bucket| bucket.home_count + bucket.not_home_count)
                .sum();
            assert_eq!(total, 10 * group.row_count);
        }
    }

    #[test]
    fn exclude_policy_counts_only_explicit_daycare_cells() {
        let mut first = empty_week();
        first[0] = CellValue::Number(-1.0);
        let table = AttendanceTable::new(vec![child(2, "A", first), child(3, "A", empty_week())]);
        let options = StatisticsOptions {
            not_applicable: NotApplicablePolicy::Exclude,
        };

        let stats = aggregate_statistics(&table, options).expect("aggregated");

        assert_eq!(stats[0].buckets[0].not_home_count, 1);
        assert_eq!(stats[0].buckets[1].not_home_count, 0);
    }

    #[test]
    fn other_numbers_weigh_nothing_and_true_counts_as_home() {
        let mut first = empty_week();
        first[0] = CellValue::Number(0.0);
        first[1] = CellValue::Bool(true);
        let mut second = empty_week();
        second[0] = CellValue::Number(2.0);
        second[1] = CellValue::Bool(false);
        let table = AttendanceTable::new(vec![child(2, "A", first), child(3, "A", second)]);

        let stats = aggregate_statistics(&table, StatisticsOptions::default()).expect("aggregated");
        let buckets = &stats[0].buckets;
        assert_eq!((buckets[0].home_count, buckets[0].not_home_count), (0, 2));
        assert_eq!((buckets[1].home_count, buckets[1].not_home_count), (1, 1));

        let options = StatisticsOptions {
            not_applicable: NotApplicablePolicy::Exclude,
        };
        let stats = aggregate_statistics(&table, options).expect("aggregated");
        assert_eq!((stats[0].buckets[0].home_count, stats[0].buckets[0].not_home_count), (0, 0));
    }

    #[test]
    fn text_in_day_column_is_fatal() {
        let mut slots = empty_week();
        slots[5] = CellValue::Text("yes".into());
        let table = AttendanceTable::new(vec![child(7, "A", slots)]);

        let error = aggregate_statistics(&table, StatisticsOptions::default())
            .expect_err("invalid cell rejected");

        match error {
            ToolError::InvalidCell { row, column, value } => {
                assert_eq!(row, 7);
                assert_eq!(column, "Wednesday afternoon");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
