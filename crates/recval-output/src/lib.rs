//! Record export library.
//!
//! Each exporter turns one [`recval_model::RecordSet`] into a file and is
//! independent of the others:
//!
//! - **CSV**: header row plus one row per record
//! - **XML**: root element with one row element per record, fields as
//!   attributes or child elements
//! - **JSON**: `data` array, record count, partition type and optional
//!   metadata
//!
//! An empty record set is never written; the exporter returns
//! [`ExportOutcome::Skipped`] instead.

mod common;
mod delimited;
pub mod error;
mod json;
mod xml;

pub use common::{ExportFormat, ExportOutcome, ensure_parent_dir, is_xml_name};
pub use delimited::write_csv;
pub use error::{ExportError, Result};
pub use json::{ColumnType, JsonDocument, check_date_format, infer_column_types, write_json};
pub use xml::write_xml;
