//! Delimited-text export.

use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::{debug, warn};

use recval_model::{CsvExportConfig, RecordSet};

use crate::common::{ExportOutcome, ensure_parent_dir};
use crate::error::{ExportError, Result};

/// Write `records` as delimited text: a header row in schema order, then one
/// row per record. Values are quoted only when they contain the delimiter, a
/// quote or a line break.
///
/// Nothing is written for an empty record set.
pub fn write_csv(
    output_path: &Path,
    records: &RecordSet,
    config: &CsvExportConfig,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        warn!(path = %output_path.display(), "no records to export, skipping CSV");
        return Ok(ExportOutcome::Skipped {
            path: output_path.to_path_buf(),
        });
    }
    let delimiter = config
        .delimiter_byte()
        .ok_or_else(|| ExportError::Delimiter {
            delimiter: config.delimiter.clone(),
        })?;

    ensure_parent_dir(output_path)?;
    let file = File::create(output_path).map_err(|source| ExportError::io(output_path, source))?;
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    let csv_error = |source| ExportError::Csv {
        path: output_path.to_path_buf(),
        source,
    };

    writer
        .write_record(records.schema().fields())
        .map_err(csv_error)?;
    for record in records {
        writer.write_record(record.values()).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|source| ExportError::io(output_path, source))?;

    debug!(path = %output_path.display(), records = records.len(), "CSV written");
    Ok(ExportOutcome::Written {
        path: output_path.to_path_buf(),
        records: records.len(),
    })
}
