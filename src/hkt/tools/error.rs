use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests attendance data, renders reports, or talks to the file store.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the header row of the input workbook does not match the
    /// expected ordered column set.
    #[error("columns of the input file are not as expected: {0}")]
    Schema(String),

    /// Raised when a day column holds text.
    #[error("invalid attendance value '{value}' in row {row}, column {column:?}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    /// Raised when a group key cannot be used inside an output file name.
    #[error("group {0:?} cannot be used in a file name")]
    InvalidGroup(String),

    /// Raised when a chart, HTML, PDF or document renderer fails.
    #[error("render error: {0}")]
    Render(String),

    /// Raised when the remote file store rejects a request.
    #[error("transfer error: {0}")]
    Transfer(String),

    /// Raised when the remote file store has no file with the given id.
    #[error("remote file not found: {0}")]
    NotFound(String),

    /// Raised when the service account key cannot be decoded or exchanged.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(error: reqwest::Error) -> Self {
        ToolError::Transfer(error.to_string())
    }
}
