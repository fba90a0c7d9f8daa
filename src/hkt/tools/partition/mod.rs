use std::collections::BTreeMap;

use tracing::warn;

use crate::hkt::tools::model::{AttendanceRow, AttendanceTable, CellValue, HalfDay, Slot, Weekday};

/// Rows of the attendance table that share the same literal `Group` value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPartition<'a> {
    pub key: String,
    pub rows: Vec<&'a AttendanceRow>,
}

impl<'a> GroupPartition<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The two half-day columns of one weekday, restricted to a group.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumns<'a> {
    pub weekday: Weekday,
    pub morning: Vec<&'a CellValue>,
    pub afternoon: Vec<&'a CellValue>,
}

impl<'a> DayColumns<'a> {
    pub fn column(&self, half_day: HalfDay) -> &[&'a CellValue] {
        match half_day {
            HalfDay::Morning => &self.morning,
            HalfDay::Afternoon => &self.afternoon,
        }
    }
}

/// Splits the table into one partition per distinct `Group` value.
///
/// Partitions come back sorted by group key. Keys are the literal cell text,
/// so `"A"` and `"a "` are different groups. Rows without a group are
/// skipped.
pub fn partition_by_group(table: &AttendanceTable) -> Vec<GroupPartition<'_>> {
    let mut groups: BTreeMap<String, Vec<&AttendanceRow>> = BTreeMap::new();

    for row in &table.rows {
        match group_key(&row.group) {
            Some(key) => groups.entry(key).or_default().push(row),
            None => warn!(line = row.line, "row has no group and is skipped"),
        }
    }

    groups
        .into_iter()
        .map(|(key, rows)| GroupPartition { key, rows })
        .collect()
}

/// Selects the morning and afternoon columns of `weekday`.
pub fn for_day<'a>(partition: &GroupPartition<'a>, weekday: Weekday) -> DayColumns<'a> {
    let column = |half_day: HalfDay| -> Vec<&'a CellValue> {
        partition
            .rows
            .iter()
            .map(|&row| row.slot(Slot::new(weekday, half_day)))
            .collect()
    };
    DayColumns {
        weekday,
        morning: column(HalfDay::Morning),
        afternoon: column(HalfDay::Afternoon),
    }
}

fn group_key(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, name: &str, group: CellValue) -> AttendanceRow {
        AttendanceRow {
            line,
            name: CellValue::Text(name.into()),
            group,
            slots: vec![CellValue::Empty; 10],
            assigned: CellValue::Empty,
            comments: CellValue::Empty,
        }
    }

    #[test]
    fn groups_are_sorted_and_literal() {
        let table = AttendanceTable::new(vec![
            row(2, "Mia", CellValue::Text("b".into())),
            row(3, "Ben", CellValue::Text("A".into())),
            row(4, "Ida", CellValue::Text("A ".into())),
            row(5, "Tom", CellValue::Text("A".into())),
        ]);

        let partitions = partition_by_group(&table);
        let keys: Vec<&str> = partitions.iter().map(|p| p.key.as_str()).collect();

        assert_eq!(keys, vec!["A", "A ", "b"]);
        assert_eq!(partitions[0].len(), 2);
    }

    #[test]
    fn numeric_groups_use_display_form_and_blank_groups_are_dropped() {
        let table = AttendanceTable::new(vec![
            row(2, "Mia", CellValue::Number(1.0)),
            row(3, "Ben", CellValue::Empty),
        ]);

        let partitions = partition_by_group(&table);

        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].key, "1");
    }

    #[test]
    fn for_day_selects_both_half_days() {
        let mut first = row(2, "Mia", CellValue::Text("A".into()));
        first.slots[2] = CellValue::Number(1.0);
        first.slots[3] = CellValue::Number(-1.0);
        let table = AttendanceTable::new(vec![first]);
        let partitions = partition_by_group(&table);

        let tuesday = for_day(&partitions[0], Weekday::Tuesday);

        assert_eq!(tuesday.morning, vec![&CellValue::Number(1.0)]);
        assert_eq!(tuesday.afternoon, vec![&CellValue::Number(-1.0)]);
    }
}
