use std::fmt;

use serde::Serialize;

use crate::hkt::tools::error::{Result, ToolError};

/// Header of the column holding the child's name.
pub const NAME_COLUMN: &str = "Name";
/// Header of the column holding the group (cohort) label.
pub const GROUP_COLUMN: &str = "Group";
/// Header of the trailing bookkeeping column.
pub const ASSIGNED_COLUMN: &str = "Assigned by us?";
/// Header of the free-text comments column.
pub const COMMENTS_COLUMN: &str = "Comments";
/// Number of half-day columns in a week.
pub const SLOT_COUNT: usize = 10;
/// Total number of columns in the input sheet.
pub const COLUMN_COUNT: usize = SLOT_COUNT + 4;

/// Working day of the reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// Monday to Friday, in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// English day name as it appears in the column headers.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// 1-based position in the week, Monday = 1.
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Morning or afternoon of a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HalfDay {
    Morning,
    Afternoon,
}

impl HalfDay {
    /// Morning before afternoon.
    pub const ALL: [HalfDay; 2] = [HalfDay::Morning, HalfDay::Afternoon];

    pub fn name(self) -> &'static str {
        match self {
            HalfDay::Morning => "morning",
            HalfDay::Afternoon => "afternoon",
        }
    }
}

/// A half-day slot, the atomic unit of attendance aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    pub weekday: Weekday,
    pub half_day: HalfDay,
}

impl Slot {
    pub fn new(weekday: Weekday, half_day: HalfDay) -> Self {
        Self { weekday, half_day }
    }

    /// All ten slots of the week, ordered by weekday and then morning before
    /// afternoon. Column layout and chart buckets both follow this order.
    pub fn week() -> impl Iterator<Item = Slot> {
        Weekday::ALL.into_iter().flat_map(|weekday| {
            HalfDay::ALL
                .into_iter()
                .map(move |half_day| Slot::new(weekday, half_day))
        })
    }

    /// Position of the slot among the day columns.
    pub fn index(self) -> usize {
        self.weekday as usize * 2 + self.half_day as usize
    }

    /// Column header (and chart label) of the slot, e.g. `Monday morning`.
    pub fn column_name(self) -> String {
        format!("{} {}", self.weekday.name(), self.half_day.name())
    }
}

/// Ordered list of the fourteen column headers the input sheet must carry.
pub fn expected_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(COLUMN_COUNT);
    columns.push(NAME_COLUMN.to_string());
    columns.push(GROUP_COLUMN.to_string());
    columns.extend(Slot::week().map(Slot::column_name));
    columns.push(ASSIGNED_COLUMN.to_string());
    columns.push(COMMENTS_COLUMN.to_string());
    columns
}

/// Raw cell content as read from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// True for empty cells and cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Interpreted content of a day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttendanceCell {
    /// Sentinel `1`: the child stays at home.
    StaysHome,
    /// Sentinel `-1`: the child comes to daycare.
    ComesToDaycare,
    /// Empty cell: the child is not enrolled for the slot.
    NotApplicable,
    /// Any other number or a false flag. Never selected and weighs nothing
    /// in the home count.
    Unmarked,
}

impl AttendanceCell {
    /// Interprets a raw cell. A `TRUE` flag counts like the `1` sentinel.
    /// Returns `None` only for non-blank text.
    pub fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            cell if cell.is_blank() => Some(AttendanceCell::NotApplicable),
            CellValue::Number(number) if *number == 1.0 => Some(AttendanceCell::StaysHome),
            CellValue::Number(number) if *number == -1.0 => Some(AttendanceCell::ComesToDaycare),
            CellValue::Number(_) => Some(AttendanceCell::Unmarked),
            CellValue::Bool(true) => Some(AttendanceCell::StaysHome),
            CellValue::Bool(false) => Some(AttendanceCell::Unmarked),
            CellValue::Empty | CellValue::Text(_) => None,
        }
    }
}

/// How empty day cells are treated by the aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NotApplicablePolicy {
    /// Empty cells count as "comes to daycare".
    #[default]
    CountAsDaycare,
    /// Empty cells are neither at home nor at daycare.
    Exclude,
}

impl NotApplicablePolicy {
    /// Applies the policy to an interpreted cell.
    pub fn resolve(self, cell: AttendanceCell) -> AttendanceCell {
        match (self, cell) {
            (NotApplicablePolicy::CountAsDaycare, AttendanceCell::NotApplicable) => {
                AttendanceCell::ComesToDaycare
            }
            (_, cell) => cell,
        }
    }
}

/// Attendance type an overview document is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AttendanceType {
    StaysHome,
    ComesToDaycare,
}

impl AttendanceType {
    /// Overview documents are produced in this order for every weekday.
    pub const ALL: [AttendanceType; 2] = [AttendanceType::StaysHome, AttendanceType::ComesToDaycare];

    /// Human readable label written into the overview cells.
    pub fn label(self) -> &'static str {
        match self {
            AttendanceType::StaysHome => "Stay at home",
            AttendanceType::ComesToDaycare => "Come to KITA",
        }
    }

    /// File name prefix derived from the label.
    pub fn slug(self) -> String {
        self.label().replace(' ', "_").to_lowercase()
    }

    /// Cell state selected by this type.
    pub fn cell(self) -> AttendanceCell {
        match self {
            AttendanceType::StaysHome => AttendanceCell::StaysHome,
            AttendanceType::ComesToDaycare => AttendanceCell::ComesToDaycare,
        }
    }
}

/// One child's row of the input sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    /// 1-based row number in the source sheet.
    pub line: usize,
    pub name: CellValue,
    pub group: CellValue,
    /// Day cells in [`Slot::week`] order.
    pub slots: Vec<CellValue>,
    pub assigned: CellValue,
    pub comments: CellValue,
}

impl AttendanceRow {
    /// Raw cell of the given slot.
    pub fn slot(&self, slot: Slot) -> &CellValue {
        &self.slots[slot.index()]
    }

    /// Interpreted cell of the given slot; fails on text.
    pub fn attendance(&self, slot: Slot) -> Result<AttendanceCell> {
        let value = self.slot(slot);
        AttendanceCell::from_value(value).ok_or_else(|| ToolError::InvalidCell {
            row: self.line,
            column: slot.column_name(),
            value: value.to_string(),
        })
    }

    /// All fourteen cells in column order.
    pub fn cells(&self) -> Vec<&CellValue> {
        let mut cells = Vec::with_capacity(COLUMN_COUNT);
        cells.push(&self.name);
        cells.push(&self.group);
        cells.extend(self.slots.iter());
        cells.push(&self.assigned);
        cells.push(&self.comments);
        cells
    }
}

/// Validated attendance sheet. Built once per command and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceTable {
    pub rows: Vec<AttendanceRow>,
}

impl AttendanceTable {
    pub fn new(rows: Vec<AttendanceRow>) -> Self {
        Self { rows }
    }

    /// Column headers, identical to [`expected_columns`].
    pub fn columns(&self) -> Vec<String> {
        expected_columns()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
