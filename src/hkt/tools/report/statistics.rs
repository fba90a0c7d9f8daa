use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::hkt::tools::aggregate::{GroupStatistics, StatisticsOptions, aggregate_statistics};
use crate::hkt::tools::error::Result;
use crate::hkt::tools::io::{excel_read, output_dir};
use crate::hkt::tools::render::{ChartRenderer, ChartSeries, ChartSpec};

const TITLE: &str = "Distribution";
const Y_LABEL: &str = "Number of children";
const HOME_SERIES: &str = "At home";
const NOT_HOME_SERIES: &str = "In KITA";
const GREEN: (u8, u8, u8) = (0, 128, 0);
const RED: (u8, u8, u8) = (255, 0, 0);

/// Turns a group's buckets into the chart description handed to the
/// renderer. Labels and both value series follow bucket order.
pub fn to_chart_spec(statistics: &GroupStatistics) -> ChartSpec {
    let labels = statistics.buckets.iter().map(|bucket| bucket.label()).collect();
    let home = statistics
        .buckets
        .iter()
        .map(|bucket| bucket.home_count as u32)
        .collect();
    let not_home = statistics
        .buckets
        .iter()
        .map(|bucket| bucket.not_home_count as u32)
        .collect();

    ChartSpec {
        title: TITLE.to_string(),
        y_label: Y_LABEL.to_string(),
        labels,
        series: vec![
            ChartSeries::new(HOME_SERIES, GREEN, home),
            ChartSeries::new(NOT_HOME_SERIES, RED, not_home),
        ],
    }
}

/// File name of a group's chart, e.g. `A_daily_distributions.png`.
pub fn chart_file_name(group: &str, extension: &str) -> String {
    format!("{group}_daily_distributions.{extension}")
}

/// Renders one group's chart into `output_dir`.
pub fn write_statistics(
    statistics: &GroupStatistics,
    renderer: &dyn ChartRenderer,
    output_dir: &Path,
) -> Result<PathBuf> {
    let spec = to_chart_spec(statistics);
    let bytes = renderer.render_chart(&spec)?;
    let path = output_dir.join(chart_file_name(&statistics.group, renderer.extension()));
    fs::write(&path, bytes)?;
    info!(group = %statistics.group, file = %path.display(), "wrote statistics chart");
    Ok(path)
}

/// Creates one distribution chart per group of the input workbook.
///
/// The workbook is validated and aggregated before `output_dir` is touched;
/// then the directory is created or emptied and the charts are written.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn create_statistics(
    input: &Path,
    output: &Path,
    renderer: &dyn ChartRenderer,
    options: StatisticsOptions,
) -> Result<Vec<PathBuf>> {
    let table = excel_read::read_table(input)?;
    info!(row_count = table.len(), "read attendance table");
    let statistics = aggregate_statistics(&table, options)?;
    for group in &statistics {
        output_dir::check_group_key(&group.group)?;
    }

    output_dir::prepare_output_dir(output)?;
    statistics
        .iter()
        .map(|group| write_statistics(group, renderer, output))
        .collect()
}
