use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use hkt_tools::aggregate::{OverviewOptions, StatisticsOptions};
use hkt_tools::io::excel_write;
use hkt_tools::model::NotApplicablePolicy;
use hkt_tools::render::{OverviewRenderers, PlottersChartRenderer};
use hkt_tools::transfer::{
    self, CredentialProvider, DRIVE_SCOPE, DriveFileStore, ServiceAccountProvider,
};
use hkt_tools::{Result, ToolError, report};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    if let Err(error) = init_logging(&cli.log_level) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "ignoring unreadable .env file");
        }
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| ToolError::Logging(err.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::DownloadInputFile(args) => execute_download(args),
        Command::UploadFiles(args) => execute_upload(args),
        Command::CreateStatistics(args) => execute_statistics(args),
        Command::CreateDailyOverviews(args) => execute_overviews(args),
        Command::WriteTemplate { output_file } => excel_write::write_template(&output_file),
    }
}

fn execute_download(args: DownloadArgs) -> Result<()> {
    let credentials = ServiceAccountProvider.resolve(&args.drive.key, &[DRIVE_SCOPE])?;
    let store = DriveFileStore::connect(&credentials)?;
    transfer::download_input_file(&store, &args.input_file_id, &args.output_file_path)?;
    Ok(())
}

fn execute_upload(args: UploadArgs) -> Result<()> {
    let credentials = ServiceAccountProvider.resolve(&args.drive.key, &[DRIVE_SCOPE])?;
    let store = DriveFileStore::connect(&credentials)?;
    for file in transfer::upload_files(&store, &args.files, &args.parent_id)? {
        println!(
            "Uploaded {} to {}.",
            file.name,
            file.url.as_deref().unwrap_or("(no link)")
        );
    }
    Ok(())
}

fn execute_statistics(args: ReportArgs) -> Result<()> {
    let options = StatisticsOptions {
        not_applicable: args
            .not_applicable
            .unwrap_or(NotApplicableArg::Daycare)
            .into(),
    };
    let written = report::create_statistics(
        &args.input_file,
        &args.output_dir,
        &PlottersChartRenderer::default(),
        options,
    )?;
    info!(count = written.len(), "statistics created");
    Ok(())
}

fn execute_overviews(args: OverviewArgs) -> Result<()> {
    let options = OverviewOptions {
        not_applicable: args
            .report
            .not_applicable
            .unwrap_or(NotApplicableArg::Exclude)
            .into(),
    };
    let stylesheet = existing_stylesheet(&args.stylesheet);
    let renderers = OverviewRenderers::production(args.wkhtmltopdf);
    let written = report::create_daily_overviews(
        &args.report.input_file,
        &args.report.output_dir,
        &renderers,
        options,
        stylesheet,
    )?;
    info!(count = written.len(), "daily overviews created");
    Ok(())
}

fn existing_stylesheet(path: &Path) -> Option<&Path> {
    if path.is_file() {
        Some(path)
    } else {
        warn!(stylesheet = %path.display(), "stylesheet not found, rendering PDFs unstyled");
        None
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Statistics and daily overviews from the weekly home/KITA attendance sheet."
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, env = "HKT_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the input workbook from Google Drive.
    DownloadInputFile(DownloadArgs),
    /// Upload files to a Google Drive folder, replacing same-named files.
    UploadFiles(UploadArgs),
    /// Create one distribution chart per group.
    CreateStatistics(ReportArgs),
    /// Create the per-day overview documents per group.
    CreateDailyOverviews(OverviewArgs),
    /// Write an empty input workbook with the expected columns.
    WriteTemplate {
        /// Path of the workbook to create.
        output_file: PathBuf,
    },
}

#[derive(clap::Args)]
struct DriveArgs {
    /// Base64 encoded service account key (JSON), e.g. `base64 key.json`.
    #[arg(
        long = "google-workspace-service-account-key",
        env = "GOOGLE_WORKSPACE_SERVICE_ACCOUNT_KEY",
        hide_env_values = true
    )]
    key: String,
}

#[derive(clap::Args)]
struct DownloadArgs {
    #[command(flatten)]
    drive: DriveArgs,

    /// Google Drive id of the input file.
    #[arg(long, env = "INPUT_FILE_ID")]
    input_file_id: String,

    /// Where the downloaded file is saved.
    output_file_path: PathBuf,
}

#[derive(clap::Args)]
struct UploadArgs {
    #[command(flatten)]
    drive: DriveArgs,

    /// Google Drive id of the destination folder.
    #[arg(long, env = "PARENT_ID")]
    parent_id: String,

    /// Files to upload.
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Attendance workbook (.xlsx).
    input_file: PathBuf,

    /// Output directory. Created when missing, emptied of files otherwise.
    output_dir: PathBuf,

    /// How empty day cells are counted.
    #[arg(long, value_enum)]
    not_applicable: Option<NotApplicableArg>,
}

#[derive(clap::Args)]
struct OverviewArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// User stylesheet applied to the PDF rendering.
    #[arg(long, env = "HKT_STYLESHEET", default_value = "style.css")]
    stylesheet: PathBuf,

    /// wkhtmltopdf executable.
    #[arg(long, env = "WKHTMLTOPDF", default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NotApplicableArg {
    /// Empty cells count as coming to KITA.
    Daycare,
    /// Empty cells count as neither.
    Exclude,
}

impl From<NotApplicableArg> for NotApplicablePolicy {
    fn from(arg: NotApplicableArg) -> Self {
        match arg {
            NotApplicableArg::Daycare => NotApplicablePolicy::CountAsDaycare,
            NotApplicableArg::Exclude => NotApplicablePolicy::Exclude,
        }
    }
}
