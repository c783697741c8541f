//! Record validation.
//!
//! - [`validators`]: pure per-field checks (IPv4 address, file extension)
//! - [`ValidatorSet`]: the `(field, validator)` pairs driven by configuration
//! - [`validate_record`]: every enabled check against one record
//! - [`partition`]: valid/invalid split of a whole record set

pub mod error;
pub mod partition;
pub mod record;
pub mod registry;
pub mod validators;

pub use error::{Result, ValidateError};
pub use partition::partition;
pub use record::{RecordValidation, validate_record};
pub use registry::{FieldRule, ValidatorSet};
pub use validators::{
    DEFAULT_ADDRESS_MESSAGE, DEFAULT_EXTENSION, EXTENSION_PARAMETER, describe, validate_extension,
    validate_field, validate_ipv4,
};
