use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort the run. Everything else is logged and skipped.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Creating log directory {} failed: {source}", dir.display())]
    LogDir { dir: PathBuf, source: std::io::Error },

    #[error("Opening log file {} failed: {source}", path.display())]
    LogFile { path: PathBuf, source: std::io::Error },

    #[error("Registering the logger failed: {0}")]
    LogInit(#[from] log::SetLoggerError),

    #[error("Resolving the home directory failed")]
    HomeDir,

    #[error("Opening workbook {} failed: {source}", path.display())]
    WorkbookOpen {
        path: PathBuf,
        source: calamine::XlsxError,
    },

    #[error("Reading sheet '{sheet}' failed: {source}")]
    SheetRead {
        sheet: String,
        source: calamine::XlsxError,
    },

    #[error("Listing directory {} failed: {source}", dir.display())]
    ListDir { dir: PathBuf, source: walkdir::Error },
}
