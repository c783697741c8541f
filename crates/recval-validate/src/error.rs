use thiserror::Error;

use recval_model::ModelError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    /// A configured field names no `tipo` and has no built-in binding.
    #[error("no validator bound to field '{field}' (set `tipo` to ipv4 or extension)")]
    UnboundField { field: String },

    /// A validator targets a field the records do not have.
    #[error(transparent)]
    Schema(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
