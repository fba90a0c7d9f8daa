use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::hkt::tools::aggregate::{OverviewOptions, OverviewTable, aggregate_overviews};
use crate::hkt::tools::error::Result;
use crate::hkt::tools::io::{excel_read, output_dir};
use crate::hkt::tools::render::OverviewRenderers;

/// An HTML file that only exists to feed the PDF converter. Removed on drop.
struct IntermediateHtml {
    path: PathBuf,
}

impl Drop for IntermediateHtml {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(file = %self.path.display(), "removed intermediate HTML"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(
                file = %self.path.display(),
                error = %err,
                "failed to remove intermediate HTML"
            ),
        }
    }
}

/// Writes the PDF and DOCX renderings of one overview table.
///
/// The HTML rendering is written next to them for the PDF converter and
/// deleted as soon as the conversion returns, successful or not.
pub fn write_overview(
    table: &OverviewTable,
    renderers: &OverviewRenderers,
    output_dir: &Path,
    stylesheet: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let base = table.base_name();
    let sibling = |extension: &str| output_dir.join(format!("{base}.{extension}"));

    let html = renderers.html.render_html_table(table)?;
    let intermediate = IntermediateHtml {
        path: sibling("html"),
    };
    fs::write(&intermediate.path, html)?;

    let pdf = renderers.pdf.html_to_pdf(&intermediate.path, stylesheet);
    drop(intermediate);
    let pdf = pdf?;
    let pdf_path = sibling("pdf");
    fs::write(&pdf_path, pdf)?;

    let document = renderers.document.render_document_table(table)?;
    let document_path = sibling(renderers.document.extension());
    fs::write(&document_path, document)?;

    info!(
        overview = %base,
        records = table.rows.len(),
        "wrote daily overview"
    );
    Ok(vec![pdf_path, document_path])
}

/// Creates the daily overview documents for every group, weekday and
/// attendance type of the input workbook.
///
/// Combinations without any matching child produce no files.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn create_daily_overviews(
    input: &Path,
    output: &Path,
    renderers: &OverviewRenderers,
    options: OverviewOptions,
    stylesheet: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let table = excel_read::read_table(input)?;
    info!(row_count = table.len(), "read attendance table");
    let overviews = aggregate_overviews(&table, options)?;
    for overview in &overviews {
        output_dir::check_group_key(&overview.group)?;
    }

    output_dir::prepare_output_dir(output)?;
    let mut written = Vec::new();
    for overview in &overviews {
        if overview.is_empty() {
            debug!(overview = %overview.base_name(), "no matching children, skipped");
            continue;
        }
        written.extend(write_overview(overview, renderers, output, stylesheet)?);
    }
    Ok(written)
}
