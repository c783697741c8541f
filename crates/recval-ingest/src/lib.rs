//! Record source loading.
//!
//! Turns a UTF-8 delimited-text file with a header row into a
//! [`recval_model::RecordSet`].

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{ReadOptions, read_records, read_records_from};
