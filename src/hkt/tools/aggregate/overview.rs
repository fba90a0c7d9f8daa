use serde::Serialize;

use crate::hkt::tools::error::Result;
use crate::hkt::tools::model::{
    AttendanceCell, AttendanceRow, AttendanceTable, AttendanceType, GROUP_COLUMN, HalfDay,
    NAME_COLUMN, NotApplicablePolicy, Slot, Weekday,
};
use crate::hkt::tools::partition::{GroupPartition, partition_by_group};

/// One record of a daily overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewRow {
    pub name: String,
    pub group: String,
    pub morning: String,
    pub afternoon: String,
}

impl OverviewRow {
    /// Cells in column order.
    pub fn cells(&self) -> [&str; 4] {
        [&self.name, &self.group, &self.morning, &self.afternoon]
    }
}

/// The children of a group matching one attendance type on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewTable {
    pub group: String,
    pub weekday: Weekday,
    pub attendance: AttendanceType,
    pub rows: Vec<OverviewRow>,
}

impl OverviewTable {
    /// `Name`, `Group` and the weekday's two half-day headers.
    pub fn columns(&self) -> [String; 4] {
        [
            NAME_COLUMN.to_string(),
            GROUP_COLUMN.to_string(),
            Slot::new(self.weekday, HalfDay::Morning).column_name(),
            Slot::new(self.weekday, HalfDay::Afternoon).column_name(),
        ]
    }

    /// File stem shared by the sibling output formats, e.g.
    /// `stay_at_home_A_1_Monday`.
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.attendance.slug(),
            self.group,
            self.weekday.ordinal(),
            self.weekday.name()
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Knobs for the overview aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewOptions {
    /// How empty day cells are treated when selecting rows.
    pub not_applicable: NotApplicablePolicy,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            not_applicable: NotApplicablePolicy::Exclude,
        }
    }
}

/// Maps a sheet row to its overview record for `weekday` and `attendance`.
///
/// Returns `None` when neither half-day matches. Matching cells carry the
/// attendance label; every other cell is blank.
pub fn overview_row(
    row: &AttendanceRow,
    group: &str,
    weekday: Weekday,
    attendance: AttendanceType,
    policy: NotApplicablePolicy,
) -> Result<Option<OverviewRow>> {
    let wanted = attendance.cell();
    let morning = policy.resolve(row.attendance(Slot::new(weekday, HalfDay::Morning))?);
    let afternoon = policy.resolve(row.attendance(Slot::new(weekday, HalfDay::Afternoon))?);

    if morning != wanted && afternoon != wanted {
        return Ok(None);
    }

    let render = |cell: AttendanceCell| {
        if cell == wanted {
            attendance.label().to_string()
        } else {
            String::new()
        }
    };

    Ok(Some(OverviewRow {
        name: row.name.to_string(),
        group: group.to_string(),
        morning: render(morning),
        afternoon: render(afternoon),
    }))
}

/// Builds the ten overview tables (five weekdays × two attendance types) of
/// one group.
pub fn aggregate_group(
    partition: &GroupPartition<'_>,
    options: OverviewOptions,
) -> Result<Vec<OverviewTable>> {
    let mut tables = Vec::with_capacity(Weekday::ALL.len() * AttendanceType::ALL.len());

    for weekday in Weekday::ALL {
        for attendance in AttendanceType::ALL {
            let mut rows = Vec::new();
            for row in &partition.rows {
                if let Some(record) = overview_row(
                    row,
                    &partition.key,
                    weekday,
                    attendance,
                    options.not_applicable,
                )? {
                    rows.push(record);
                }
            }
            tables.push(OverviewTable {
                group: partition.key.clone(),
                weekday,
                attendance,
                rows,
            });
        }
    }

    Ok(tables)
}

/// Builds the overview tables of every group, groups in partition order.
pub fn aggregate_overviews(
    table: &AttendanceTable,
    options: OverviewOptions,
) -> Result<Vec<OverviewTable>> {
    let mut tables = Vec::new();
    for partition in partition_by_group(table) {
        tables.extend(aggregate_group(&partition, options)?);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::hkt::tools::model::CellValue;

    fn child(line: usize, name: &str, group: &str, slots: Vec<CellValue>) -> AttendanceRow {
        AttendanceRow {
            line,
            name: CellValue::Text(name.into()),
            group: CellValue::Text(group.into()),
            slots,
            assigned: CellValue::Empty,
            comments: CellValue::Empty,
        }
    }

    fn scenario_table() -> AttendanceTable {
        let mut slots = vec![CellValue::Empty; 10];
        slots[0] = CellValue::Number(1.0);
        AttendanceTable::new(vec![
            child(2, "Mia", "A", slots),
            child(3, "Ben", "A", vec![CellValue::Empty; 10]),
        ])
    }

    fn find(tables: &[OverviewTable], weekday: Weekday, attendance: AttendanceType) -> &OverviewTable {
        tables
            .iter()
            .find(|table| table.weekday == weekday && table.attendance == attendance)
            .expect("overview table present")
    }

    #[test]
    fn monday_stay_at_home_selects_only_the_first_child() {
        let tables = aggregate_overviews(&scenario_table(), OverviewOptions::default())
            .expect("aggregated");

        let monday = find(&tables, Weekday::Monday, AttendanceType::StaysHome);

        assert_eq!(
            monday.rows,
            vec![OverviewRow {
                name: "Mia".into(),
                group: "A".into(),
                morning: "Stay at home".into(),
                afternoon: String::new(),
            }]
        );
        assert_eq!(monday.base_name(), "stay_at_home_A_1_Monday");
        assert_eq!(
            monday.columns(),
            ["Name", "Group", "Monday morning", "Monday afternoon"].map(String::from)
        );
    }

    #[test]
    fn opposite_sentinel_is_blanked() {
        let mut slots = vec![CellValue::Empty; 10];
        slots[6] = CellValue::Number(-1.0);
        slots[7] = CellValue::Number(1.0);
        let table = AttendanceTable::new(vec![child(2, "Ida", "B", slots)]);

        let tables = aggregate_overviews(&table, OverviewOptions::default()).expect("aggregated");

        let home = find(&tables, Weekday::Thursday, AttendanceType::StaysHome);
        assert_eq!(home.rows[0].morning, "");
        assert_eq!(home.rows[0].afternoon, "Stay at home");
        let kita = find(&tables, Weekday::Thursday, AttendanceType::ComesToDaycare);
        assert_eq!(kita.rows[0].morning, "Come to KITA");
        assert_eq!(kita.rows[0].afternoon, "");
    }

    #[test]
    fn cells_only_hold_their_own_label() {
        let mut first = vec![CellValue::Number(-1.0); 10];
        first[0] = CellValue::Number(1.0);
        first[9] = CellValue::Empty;
        let table = AttendanceTable::new(vec![
            child(2, "Mia", "A", first),
            child(3, "Ben", "A", vec![CellValue::Number(1.0); 10]),
        ]);

        for policy in [NotApplicablePolicy::Exclude, NotApplicablePolicy::CountAsDaycare] {
            let options = OverviewOptions {
                not_applicable: policy,
            };
            for table in aggregate_overviews(&table, options).expect("aggregated") {
                let label = table.attendance.label();
                for row in &table.rows {
                    for cell in [&row.morning, &row.afternoon] {
                        assert!(cell.is_empty() || cell == label, "unexpected cell {cell:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn count_as_daycare_selects_empty_cells_for_kita() {
        let options = OverviewOptions {
            not_applicable: NotApplicablePolicy::CountAsDaycare,
        };

        let tables = aggregate_overviews(&scenario_table(), options).expect("aggregated");

        let kita = find(&tables, Weekday::Monday, AttendanceType::ComesToDaycare);
        let names: Vec<&str> = kita.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Mia", "Ben"]);
        assert_eq!(kita.rows[0].morning, "");
        assert_eq!(kita.rows[0].afternoon, "Come to KITA");
    }

    #[test]
    fn other_numbers_are_never_selected() {
        let mut slots = vec![CellValue::Empty; 10];
        slots[0] = CellValue::Number(0.0);
        slots[1] = CellValue::Number(2.0);
        slots[2] = CellValue::Bool(true);
        let table = AttendanceTable::new(vec![child(2, "Mia", "A", slots)]);

        for policy in [NotApplicablePolicy::Exclude, NotApplicablePolicy::CountAsDaycare] {
            let options = OverviewOptions {
                not_applicable: policy,
            };
            let tables = aggregate_overviews(&table, options).expect("aggregated");

            assert!(find(&tables, Weekday::Monday, AttendanceType::StaysHome).is_empty());
            assert!(find(&tables, Weekday::Monday, AttendanceType::ComesToDaycare).is_empty());
            let tuesday = find(&tables, Weekday::Tuesday, AttendanceType::StaysHome);
            assert_eq!(tuesday.rows[0].morning, "Stay at home");
        }
    }

    #[test]
    fn text_in_day_column_is_fatal() {
        let mut slots = vec![CellValue::Empty; 10];
        slots[1] = CellValue::Text("maybe".into());
        let table = AttendanceTable::new(vec![child(4, "Mia", "A", slots)]);

        let error = aggregate_overviews(&table, OverviewOptions::default())
            .expect_err("text rejected");

        assert!(matches!(
            error,
            crate::hkt::tools::error::ToolError::InvalidCell { row: 4, .. }
        ));
    }

    #[test]
    fn base_names_are_unique() {
        let table = AttendanceTable::new(vec![
            child(2, "Mia", "A", vec![CellValue::Empty; 10]),
            child(3, "Ben", "B", vec![CellValue::Empty; 10]),
        ]);

        let tables = aggregate_overviews(&table, OverviewOptions::default()).expect("aggregated");
        let names: HashSet<String> = tables.iter().map(OverviewTable::base_name).collect();

        assert_eq!(tables.len(), 20);
        assert_eq!(names.len(), tables.len());
    }
}
