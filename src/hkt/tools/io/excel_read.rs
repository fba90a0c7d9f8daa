use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx};

use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::model::{
    AttendanceRow, AttendanceTable, COLUMN_COUNT, CellValue, SLOT_COUNT, expected_columns,
};

/// Reads the attendance workbook at `path` and validates it.
pub fn read_table(path: &Path) -> Result<AttendanceTable> {
    if !path.is_file() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    validate(&bytes)
}

/// Parses the first worksheet of an `.xlsx` payload into an
/// [`AttendanceTable`].
///
/// The header row must equal the fourteen expected columns in order. Header
/// cells are compared with whitespace runs collapsed, so the line-broken
/// `Monday\nmorning` headers of the source workbook are accepted. Cell values
/// are kept as they are; interpreting them is left to the aggregations.
pub fn validate(raw_bytes: &[u8]) -> Result<AttendanceTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(raw_bytes))?;
    let range = read_first_sheet(&mut workbook)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(Some(cell))))
            .collect(),
        None => Vec::new(),
    };

    let expected = expected_columns();
    if headers != expected {
        return Err(ToolError::Schema(format!(
            "expected ordered set of columns {expected:?}, found {headers:?}"
        )));
    }

    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let rows = rows
        .enumerate()
        .map(|(offset, row)| parse_row(first_line + offset + 1, row))
        .collect();

    Ok(AttendanceTable::new(rows))
}

fn read_first_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
) -> Result<calamine::Range<DataType>> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::Schema("workbook contains no worksheet".into()))?;
    let range_result = workbook
        .worksheet_range(&name)
        .ok_or_else(|| ToolError::Schema(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn parse_row(line: usize, row: &[DataType]) -> AttendanceRow {
    let cell = |index: usize| cell_to_value(row.get(index));
    AttendanceRow {
        line,
        name: cell(0),
        group: cell(1),
        slots: (2..2 + SLOT_COUNT).map(cell).collect(),
        assigned: cell(COLUMN_COUNT - 2),
        comments: cell(COLUMN_COUNT - 1),
    }
}

fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell_to_value(cell: Option<&DataType>) -> CellValue {
    match cell {
        Some(DataType::Float(value)) => CellValue::Number(*value),
        Some(DataType::Int(value)) => CellValue::Number(*value as f64),
        Some(DataType::Bool(value)) => CellValue::Bool(*value),
        Some(DataType::String(value)) => CellValue::Text(value.clone()),
        Some(DataType::Empty) | None => CellValue::Empty,
        Some(other) => CellValue::Text(other.to_string()),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
