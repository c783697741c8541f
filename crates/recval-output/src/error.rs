//! Error types for record export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination could not be created or written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write XML {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("failed to serialize JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A tag or field name cannot be used as an XML name.
    #[error("'{name}' is not a valid XML name")]
    InvalidName { name: String },

    /// The timestamp format has an unknown or unsupported specifier.
    #[error("invalid date format '{format}'")]
    DateFormat { format: String },

    /// The delimiter is not a single ASCII character.
    #[error("invalid delimiter '{delimiter}': expected one ASCII character")]
    Delimiter { delimiter: String },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
