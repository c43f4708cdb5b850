//! Error types for the import / export boundaries
//!
//! Cell-level problems never surface here: malformed numbers degrade to 0
//! inside the record parser. Only whole-file failures become errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// The workbook could not be turned into raw rows.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Workbook could not be decoded: {0}")]
    Decode(#[from] calamine::Error),

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Sheet '{0}' has no populated range")]
    EmptySheet(String),
}

/// The workbook could not be assembled or written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Workbook serialization error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
}

/// Any failure of a single pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
