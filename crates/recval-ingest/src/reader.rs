use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, trace};

use recval_model::{RecordSet, Schema};

use crate::error::{IngestError, Result};

/// Options for reading a delimited-text source.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}').trim().to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

/// Read every record of the delimited-text file at `path`.
///
/// The first non-blank row is the header. Rows whose cells are all empty are
/// skipped and do not count towards record positions; a row of whitespace is
/// kept. Values are kept verbatim; short rows are padded with empty values.
/// Longer rows fail with `RaggedRow` unless every extra cell is empty, as
/// left by a trailing delimiter.
pub fn read_records(path: &Path, options: ReadOptions) -> Result<RecordSet> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records_from(file, path, options)?;
    debug!(
        path = %path.display(),
        records = records.len(),
        fields = records.schema().len(),
        "source loaded"
    );
    Ok(records)
}

/// Read records from any reader; `origin` only labels errors.
pub fn read_records_from<R: Read>(
    reader: R,
    origin: &Path,
    options: ReadOptions,
) -> Result<RecordSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);
    let parse_error = |source| IngestError::CsvParse {
        path: origin.to_path_buf(),
        source,
    };

    let mut rows = reader.records();
    let header = loop {
        match rows.next() {
            Some(record) => {
                let record = record.map_err(parse_error)?;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => {
                return Err(IngestError::EmptySource {
                    path: origin.to_path_buf(),
                });
            }
        }
    };
    let schema = Schema::new(header.iter().map(normalize_header)).map_err(|source| {
        IngestError::Schema {
            path: origin.to_path_buf(),
            source,
        }
    })?;
    let width = schema.len();
    let mut records = RecordSet::new(Arc::new(schema));

    for record in rows {
        let record = record.map_err(parse_error)?;
        if is_blank(&record) {
            continue;
        }
        let position = records.len() + 1;
        if record.len() > width && record.iter().skip(width).any(|value| !value.is_empty()) {
            return Err(IngestError::RaggedRow {
                path: origin.to_path_buf(),
                position,
                expected: width,
                found: record.len(),
            });
        }
        let mut values: Vec<String> = record.iter().take(width).map(str::to_string).collect();
        if values.len() < width {
            trace!(position, found = values.len(), "padding short row");
            values.resize(width, String::new());
        }
        records
            .push_values(values)
            .map_err(|source| IngestError::Schema {
                path: origin.to_path_buf(),
                source,
            })?;
    }
    Ok(records)
}
