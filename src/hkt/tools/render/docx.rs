use std::io::Cursor;

use docx_rs::{Docx, PageMargin, Paragraph, Run, Table, TableCell, TableRow};

use crate::hkt::tools::aggregate::OverviewTable;
use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::render::TableToDocument;

/// Half an inch, in twentieths of a point.
const HALF_INCH_TWIPS: i32 = 720;

/// Builds a `.docx` with a single bordered table: a bold header row followed
/// by one row per record.
#[derive(Debug, Clone, Copy)]
pub struct DocxTableRenderer {
    /// Top and bottom page margin in twips.
    pub vertical_margin: i32,
}

impl Default for DocxTableRenderer {
    fn default() -> Self {
        Self {
            vertical_margin: HALF_INCH_TWIPS,
        }
    }
}

impl DocxTableRenderer {
    fn build(&self, table: &OverviewTable) -> Docx {
        let header = TableRow::new(
            table
                .columns()
                .iter()
                .map(|column| text_cell(column, true))
                .collect(),
        );
        let mut rows = vec![header];
        rows.extend(table.rows.iter().map(|record| {
            TableRow::new(
                record
                    .cells()
                    .into_iter()
                    .map(|cell| text_cell(cell, false))
                    .collect(),
            )
        }));

        Docx::new()
            .page_margin(
                PageMargin::new()
                    .top(self.vertical_margin)
                    .bottom(self.vertical_margin),
            )
            .add_table(Table::new(rows))
    }
}

impl TableToDocument for DocxTableRenderer {
    fn extension(&self) -> &str {
        "docx"
    }

    fn render_document_table(&self, table: &OverviewTable) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.build(table)
            .build()
            .pack(&mut cursor)
            .map_err(|err| ToolError::Render(format!("document table: {err}")))?;
        Ok(cursor.into_inner())
    }
}

fn text_cell(text: &str, bold: bool) -> TableCell {
    let mut run = Run::new().add_text(text);
    if bold {
        run = run.bold();
    }
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
