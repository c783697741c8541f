//! XML tree export.
//!
//! One root element holding one row element per record. In attribute mode
//! each field becomes an attribute of the row element; in element mode each
//! field becomes a child element whose text is the value. Fields follow the
//! record's own order.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use tracing::{debug, warn};

use recval_model::{Record, RecordSet, XmlExportConfig};

use crate::common::{ExportOutcome, ensure_parent_dir, require_xml_name};
use crate::error::{ExportError, Result};

/// Write `records` as an XML document.
///
/// Nothing is written for an empty record set.
pub fn write_xml(
    output_path: &Path,
    records: &RecordSet,
    config: &XmlExportConfig,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        warn!(path = %output_path.display(), "no records to export, skipping XML");
        return Ok(ExportOutcome::Skipped {
            path: output_path.to_path_buf(),
        });
    }
    require_xml_name(&config.root_tag)?;
    require_xml_name(&config.row_tag)?;
    for field in records.schema().fields() {
        require_xml_name(field)?;
    }

    ensure_parent_dir(output_path)?;
    let file = File::create(output_path).map_err(|source| ExportError::io(output_path, source))?;
    let mut writer = BufWriter::new(file);
    write_xml_to(&mut writer, records, config).map_err(|source| ExportError::Xml {
        path: output_path.to_path_buf(),
        message: source.to_string(),
    })?;
    writer
        .flush()
        .map_err(|source| ExportError::io(output_path, source))?;

    debug!(path = %output_path.display(), records = records.len(), "XML written");
    Ok(ExportOutcome::Written {
        path: output_path.to_path_buf(),
        records: records.len(),
    })
}

/// Serialize `records` into `out`. Names are assumed to be valid XML names.
fn write_xml_to<W: Write>(
    out: W,
    records: &RecordSet,
    config: &XmlExportConfig,
) -> std::io::Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', config.indent);

    emit(&mut xml, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut xml, Event::Start(BytesStart::new(config.root_tag.as_str())))?;
    for record in records {
        if config.attributes {
            write_attribute_row(&mut xml, record, &config.row_tag)?;
        } else {
            write_element_row(&mut xml, record, &config.row_tag)?;
        }
    }
    emit(&mut xml, Event::End(BytesEnd::new(config.root_tag.as_str())))?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_attribute_row<W: Write>(
    xml: &mut Writer<W>,
    record: &Record,
    row_tag: &str,
) -> std::io::Result<()> {
    let mut row = BytesStart::new(row_tag);
    for (field, value) in record.fields() {
        row.push_attribute(Attribute {
            key: QName(field.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }
    emit(xml, Event::Empty(row))
}

/// Escape markup characters, then write tab, line feed and carriage return as
/// character references; parsers turn raw ones in attribute values into spaces.
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    let mut out = String::with_capacity(escaped.len());
    for ch in escaped.chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}

fn write_element_row<W: Write>(
    xml: &mut Writer<W>,
    record: &Record,
    row_tag: &str,
) -> std::io::Result<()> {
    emit(xml, Event::Start(BytesStart::new(row_tag)))?;
    for (field, value) in record.fields() {
        emit(xml, Event::Start(BytesStart::new(field)))?;
        emit(xml, Event::Text(BytesText::new(value)))?;
        emit(xml, Event::End(BytesEnd::new(field)))?;
    }
    emit(xml, Event::End(BytesEnd::new(row_tag)))
}

fn emit<W: Write>(xml: &mut Writer<W>, event: Event<'_>) -> std::io::Result<()> {
    xml.write_event(event).map_err(std::io::Error::other)
}
