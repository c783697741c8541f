//! Error types for record source loading.

use std::path::PathBuf;
use thiserror::Error;

use recval_model::ModelError;

/// Errors that can occur while reading the record source.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file does not exist.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Source file exists but could not be opened or read.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text or invalid UTF-8.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No header row was found.
    #[error("source has no header row: {path}")]
    EmptySource { path: PathBuf },

    /// A data row has more cells than the header.
    #[error("row {position} in {path} has {found} fields, header defines {expected}")]
    RaggedRow {
        path: PathBuf,
        position: usize,
        expected: usize,
        found: usize,
    },

    /// Header names do not form a valid schema.
    #[error("invalid header in {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
