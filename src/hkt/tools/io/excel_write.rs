use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::hkt::tools::error::Result;
use crate::hkt::tools::model::{AttendanceTable, CellValue, expected_columns};

/// Writes the table back to an `.xlsx` workbook with the expected header row.
///
/// Rows keep their original sheet line so that reading the file again yields
/// the same table.
pub fn write_table(path: &Path, table: &AttendanceTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet)?;

    for row in &table.rows {
        let row_idx = row.line.saturating_sub(1) as u32;
        for (col_idx, cell) in row.cells().into_iter().enumerate() {
            let col_idx = col_idx as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Number(value) => {
                    worksheet.write_number(row_idx, col_idx, *value)?;
                }
                CellValue::Text(value) => {
                    worksheet.write_string(row_idx, col_idx, value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row_idx, col_idx, *value)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Writes an empty input workbook carrying only the header row.
pub fn write_template(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet)?;
    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}

fn write_header(worksheet: &mut Worksheet) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col_idx, header) in expected_columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &bold)?;
    }
    Ok(())
}
