//! Rendering capabilities used by the report commands.
//!
//! Each output format sits behind its own trait so the report adapters can be
//! driven by in-memory fakes. The production implementations live in the
//! sub-modules: [`chart`] draws PNG bar charts with plotters, [`html`] writes
//! the table markup, [`pdf`] shells out to `wkhtmltopdf`, and [`docx`] builds
//! Word documents with docx-rs.

pub mod chart;
pub mod docx;
pub mod html;
pub mod pdf;

use std::path::Path;

use serde::Serialize;

use crate::hkt::tools::aggregate::OverviewTable;
use crate::hkt::tools::error::Result;

pub use chart::PlottersChartRenderer;
pub use docx::DocxTableRenderer;
pub use html::HtmlTableRenderer;
pub use pdf::WkhtmltopdfConverter;

/// One bar series of a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// Legend entry.
    pub name: String,
    /// Bar fill as RGB.
    pub color: (u8, u8, u8),
    pub values: Vec<u32>,
    /// Text drawn above each bar.
    pub annotations: Vec<String>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, color: (u8, u8, u8), values: Vec<u32>) -> Self {
        let annotations = values.iter().map(u32::to_string).collect();
        Self {
            name: name.into(),
            color,
            values,
            annotations,
        }
    }
}

/// Everything a chart renderer needs to draw one group's distribution.
///
/// `labels`, and the `values` and `annotations` of every series, are index
/// aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    /// Largest bar value, used to size the y axis.
    pub fn max_value(&self) -> u32 {
        self.series
            .iter()
            .flat_map(|series| series.values.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Draws a grouped bar chart.
pub trait ChartRenderer {
    /// File extension of the produced image, without the dot.
    fn extension(&self) -> &str;

    fn render_chart(&self, spec: &ChartSpec) -> Result<Vec<u8>>;
}

/// Renders an overview table as HTML markup.
pub trait TableToHtml {
    fn render_html_table(&self, table: &OverviewTable) -> Result<String>;
}

/// Converts an HTML file on disk into PDF bytes.
pub trait HtmlToPdf {
    fn html_to_pdf(&self, html: &Path, stylesheet: Option<&Path>) -> Result<Vec<u8>>;
}

/// Renders an overview table as a word-processor document.
pub trait TableToDocument {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str;

    fn render_document_table(&self, table: &OverviewTable) -> Result<Vec<u8>>;
}

/// The three renderers driven by the daily overview command.
pub struct OverviewRenderers {
    pub html: Box<dyn TableToHtml>,
    pub pdf: Box<dyn HtmlToPdf>,
    pub document: Box<dyn TableToDocument>,
}

impl OverviewRenderers {
    /// Production renderers; `wkhtmltopdf` is the converter binary to spawn.
    pub fn production(wkhtmltopdf: impl Into<std::path::PathBuf>) -> Self {
        Self {
            html: Box::new(HtmlTableRenderer),
            pdf: Box::new(WkhtmltopdfConverter::new(wkhtmltopdf)),
            document: Box::new(DocxTableRenderer::default()),
        }
    }
}
