use std::fmt::Write;

use html_escape::encode_text;

use crate::hkt::tools::aggregate::OverviewTable;
use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::render::TableToHtml;

/// Writes a plain bordered `<table>` fragment: header row, one row per
/// record, no index column.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableRenderer;

impl TableToHtml for HtmlTableRenderer {
    fn render_html_table(&self, table: &OverviewTable) -> Result<String> {
        render(table).map_err(|err| ToolError::Render(format!("HTML table: {err}")))
    }
}

fn render(table: &OverviewTable) -> std::result::Result<String, std::fmt::Error> {
    let mut html = String::new();
    writeln!(html, "<table border=\"1\" class=\"dataframe\">")?;
    writeln!(html, "  <thead>")?;
    writeln!(html, "    <tr style=\"text-align: right;\">")?;
    for column in table.columns() {
        writeln!(html, "      <th>{}</th>", encode_text(&column))?;
    }
    writeln!(html, "    </tr>")?;
    writeln!(html, "  </thead>")?;
    writeln!(html, "  <tbody>")?;
    for row in &table.rows {
        writeln!(html, "    <tr>")?;
        for cell in row.cells() {
            writeln!(html, "      <td>{}</td>", encode_text(cell))?;
        }
        writeln!(html, "    </tr>")?;
    }
    writeln!(html, "  </tbody>")?;
    write!(html, "</table>")?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hkt::tools::aggregate::OverviewRow;
    use crate::hkt::tools::model::{AttendanceType, Weekday};

    #[test]
    fn renders_header_and_escaped_rows() {
        let table = OverviewTable {
            group: "A".into(),
            weekday: Weekday::Tuesday,
            attendance: AttendanceType::StaysHome,
            rows: vec![OverviewRow {
                name: "Tom & <Jerry>".into(),
                group: "A".into(),
                morning: "Stay at home".into(),
                afternoon: String::new(),
            }],
        };

        let html = HtmlTableRenderer.render_html_table(&table).expect("html rendered");

        assert!(html.starts_with("<table border=\"1\" class=\"dataframe\">"));
        assert!(html.contains("<th>Tuesday afternoon</th>"));
        assert!(html.contains("<td>Tom &amp; &lt;Jerry&gt;</td>"));
        assert!(html.contains("<td></td>"));
        assert_eq!(html.matches("<tr>").count(), 1);
    }
}
