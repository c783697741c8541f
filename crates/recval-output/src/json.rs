//! JSON document export.
//!
//! The document holds a `data` array with one object per record, the
//! `total_records` count, the partition `type` and, when enabled, a
//! `metadata` block. Non-ASCII text is written as-is.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use recval_model::{JsonExportConfig, PartitionKind, Record, RecordSet};

use crate::common::{ExportOutcome, ensure_parent_dir};
use crate::error::{ExportError, Result};

/// How the values of one column are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Boolean,
    Text,
}

/// Infer a rendering per column from the non-empty values of `records`.
///
/// A column is numeric when every non-empty value reads back exactly as
/// written (`7`, `-3`, `2.5`, not `007` or `1.50`), boolean when every
/// non-empty value is `true`/`false` in any case, and text otherwise.
pub fn infer_column_types(records: &RecordSet) -> Vec<ColumnType> {
    (0..records.schema().len())
        .map(|idx| {
            let mut seen = false;
            let mut numeric = true;
            let mut boolean = true;
            for record in records {
                let value = record.values()[idx].as_str();
                if value.is_empty() {
                    continue;
                }
                seen = true;
                numeric &= parse_number(value).is_some();
                boolean &= parse_bool(value).is_some();
                if !numeric && !boolean {
                    break;
                }
            }
            match (seen, numeric, boolean) {
                (true, true, _) => ColumnType::Number,
                (true, false, true) => ColumnType::Boolean,
                _ => ColumnType::Text,
            }
        })
        .collect()
}

fn parse_number(value: &str) -> Option<Number> {
    if let Ok(int) = value.parse::<i64>()
        && int.to_string() == value
    {
        return Some(Number::from(int));
    }
    if !value
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == '.' || ch == '-')
    {
        return None;
    }
    let float = value.parse::<f64>().ok()?;
    let number = Number::from_f64(float)?;
    (number.to_string() == value).then_some(number)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn typed_value(value: &str, column: ColumnType) -> Value {
    match column {
        ColumnType::Text => Value::String(value.to_string()),
        _ if value.is_empty() => Value::Null,
        ColumnType::Number => parse_number(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string())),
        ColumnType::Boolean => parse_bool(value)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::String(value.to_string())),
    }
}

/// Check a strftime-style format string without producing a timestamp.
pub fn check_date_format(format: &str) -> Result<()> {
    format_timestamp(&Local::now(), format).map(|_| ())
}

fn format_timestamp(at: &DateTime<Local>, format: &str) -> Result<String> {
    let invalid = || ExportError::DateFormat {
        format: format.to_string(),
    };
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }
    let mut out = String::new();
    write!(out, "{}", at.format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(out)
}

struct Entry<'a> {
    record: &'a Record,
    columns: &'a [ColumnType],
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for ((field, value), column) in self.record.fields().zip(self.columns) {
            map.serialize_entry(field, &typed_value(value, *column))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    export_date: String,
    fields: &'a [String],
    configuration: EchoedConfig<'a>,
}

#[derive(Serialize)]
struct EchoedConfig<'a> {
    include_metadata: bool,
    date_format: &'a str,
    indent: usize,
}

/// A JSON export document borrowing its records.
#[derive(Serialize)]
pub struct JsonDocument<'a> {
    data: Vec<Entry<'a>>,
    total_records: usize,
    #[serde(rename = "type")]
    kind: PartitionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata<'a>>,
}

impl<'a> JsonDocument<'a> {
    /// Build the document; `exported_at` is only used for the metadata block.
    pub fn new(
        records: &'a RecordSet,
        kind: PartitionKind,
        config: &'a JsonExportConfig,
        columns: &'a [ColumnType],
        exported_at: &DateTime<Local>,
    ) -> Result<Self> {
        let data: Vec<Entry<'a>> = records
            .iter()
            .map(|record| Entry { record, columns })
            .collect();
        let metadata = if config.include_metadata {
            Some(Metadata {
                export_date: format_timestamp(exported_at, &config.date_format)?,
                fields: records.schema().fields(),
                configuration: EchoedConfig {
                    include_metadata: config.include_metadata,
                    date_format: &config.date_format,
                    indent: config.indent,
                },
            })
        } else {
            None
        };
        Ok(Self {
            total_records: data.len(),
            data,
            kind,
            metadata,
        })
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Serialize with `indent` spaces per level.
    pub fn write_to<W: Write>(&self, out: W, indent: usize) -> serde_json::Result<()> {
        let indent = vec![b' '; indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(out, formatter);
        self.serialize(&mut serializer)
    }

    pub fn to_vec_pretty(&self, indent: usize) -> serde_json::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, indent)?;
        Ok(buffer)
    }
}

/// Write `records` as a JSON document of the given partition `kind`.
///
/// Nothing is written for an empty record set.
pub fn write_json(
    output_path: &Path,
    records: &RecordSet,
    kind: PartitionKind,
    config: &JsonExportConfig,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        warn!(path = %output_path.display(), "no records to export, skipping JSON");
        return Ok(ExportOutcome::Skipped {
            path: output_path.to_path_buf(),
        });
    }
    let columns = infer_column_types(records);
    let document = JsonDocument::new(records, kind, config, &columns, &Local::now())?;

    ensure_parent_dir(output_path)?;
    let file = File::create(output_path).map_err(|source| ExportError::io(output_path, source))?;
    let mut writer = BufWriter::new(file);
    document
        .write_to(&mut writer, config.indent)
        .map_err(|source| ExportError::Json {
            path: output_path.to_path_buf(),
            source,
        })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| ExportError::io(output_path, source))?;

    debug!(path = %output_path.display(), records = records.len(), kind = %kind, "JSON written");
    Ok(ExportOutcome::Written {
        path: output_path.to_path_buf(),
        records: records.len(),
    })
}
