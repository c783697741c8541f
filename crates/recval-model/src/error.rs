use thiserror::Error;

/// Errors raised when records are accessed against their schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A lookup named a field the schema does not define.
    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    /// A schema was built with the same field name twice.
    #[error("duplicate field in schema: {field}")]
    DuplicateField { field: String },

    /// A record carried a different number of values than its schema.
    #[error("record {position} has {found} values, schema defines {expected}")]
    Arity {
        position: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
