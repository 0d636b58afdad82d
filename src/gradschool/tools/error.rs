use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads, merges, audits, or writes workbooks.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a JSON layout file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the input workbook exists but cannot be opened because
    /// access is denied, typically because another program holds it open.
    #[error("permission denied: unable to access {0}; ensure the file is closed and try again")]
    AccessDenied(PathBuf),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a requested sheet is not present in the workbook.
    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    /// Raised when a sheet lacks the column rows are joined on.
    #[error("'{column}' not found in sheet '{sheet}'")]
    MissingJoinColumn { sheet: String, column: String },

    /// Raised when the anchor sheet of the merge is absent or unusable.
    #[error("the '{sheet}' sheet is missing or could not be processed")]
    MissingPrimarySheet { sheet: String },

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a layout definition is inconsistent.
    #[error("invalid sheet layout: {0}")]
    InvalidLayout(String),

    /// Raised when the output workbook was saved but has no content.
    #[error("output file is empty (0 bytes): {0}")]
    EmptyOutput(PathBuf),

    /// Raised when the output workbook is not present after saving.
    #[error("failed to create output file: {0}")]
    MissingOutput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Returns true when the error means the workbook file itself could not be
    /// accessed, which aborts a run instead of skipping a single sheet.
    pub fn is_access_denied(&self) -> bool {
        match self {
            ToolError::AccessDenied(_) => true,
            ToolError::Io(error) => error.kind() == std::io::ErrorKind::PermissionDenied,
            ToolError::ExcelRead(calamine::XlsxError::Io(error)) => {
                error.kind() == std::io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}
