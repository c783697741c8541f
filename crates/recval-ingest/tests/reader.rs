//! Integration tests for delimited-text loading.

use std::io::Write;
use std::path::Path;

use recval_ingest::{IngestError, ReadOptions, read_records, read_records_from};
use recval_model::ModelError;
use tempfile::NamedTempFile;

fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write source");
    file.flush().expect("flush source");
    file
}

#[test]
fn test_reads_header_and_rows() {
    let file = write_source("ip,ruta_script,host\n192.168.1.1,/opt/a.sh,web\n10.0.0.1,/opt/b.sh,db\n");
    let records = read_records(file.path(), ReadOptions::default()).unwrap();

    assert_eq!(records.schema().fields(), ["ip", "ruta_script", "host"]);
    assert_eq!(records.len(), 2);
    let second = &records.records()[1];
    assert_eq!(second.position(), 2);
    assert_eq!(second.get("host").unwrap(), "db");
}

#[test]
fn test_blank_rows_do_not_count() {
    let source = "ip,ruta_script\n1.1.1.1,a.sh\n,\n2.2.2.2,b.sh\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records.records()[1].position(), 2);
    assert_eq!(records.records()[1].get("ip").unwrap(), "2.2.2.2");
}

#[test]
fn test_whitespace_rows_kept() {
    let source = "ip,ruta_script\n1.1.1.1,a.sh\n  ,  \n2.2.2.2,b.sh\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    assert_eq!(records.len(), 3);
    let kept = &records.records()[1];
    assert_eq!(kept.position(), 2);
    assert_eq!(kept.get("ip").unwrap(), "  ");
    assert_eq!(kept.get("ruta_script").unwrap(), "  ");
    assert_eq!(records.records()[2].position(), 3);
}

#[test]
fn test_values_kept_verbatim() {
    let source = "ip,ruta_script\n\" 1.1.1.1\",\"/opt/with, comma.sh\"\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    let record = &records.records()[0];
    assert_eq!(record.get("ip").unwrap(), " 1.1.1.1");
    assert_eq!(record.get("ruta_script").unwrap(), "/opt/with, comma.sh");
}

#[test]
fn test_header_bom_and_spaces_removed() {
    let source = "\u{feff}ip , ruta_script\n1.1.1.1,a.sh\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    assert_eq!(records.schema().fields(), ["ip", "ruta_script"]);
}

#[test]
fn test_short_rows_padded() {
    let source = "ip,ruta_script,host\n1.1.1.1\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    let record = &records.records()[0];
    assert_eq!(record.get("ruta_script").unwrap(), "");
    assert_eq!(record.get("host").unwrap(), "");
}

#[test]
fn test_long_rows_rejected() {
    let source = "ip,ruta_script\n1.1.1.1,a.sh\n2.2.2.2,b.sh,extra\n";
    let err = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap_err();

    match err {
        IngestError::RaggedRow {
            position,
            expected,
            found,
            ..
        } => {
            assert_eq!(position, 2);
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_trailing_empty_cells_tolerated() {
    let source = "ip,ruta_script\n1.1.1.1,a.sh,\n2.2.2.2,b.sh,,\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records.records()[1].values(), ["2.2.2.2", "b.sh"]);
}

#[test]
fn test_extra_whitespace_cell_rejected() {
    let source = "ip,ruta_script\n1.1.1.1,a.sh, \n";
    let err = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap_err();

    assert!(matches!(err, IngestError::RaggedRow { position: 1, found: 3, .. }));
}

#[test]
fn test_custom_delimiter() {
    let source = "ip;ruta_script\n1.1.1.1;a.sh\n";
    let records = read_records_from(
        source.as_bytes(),
        Path::new("mem"),
        ReadOptions { delimiter: b';' },
    )
    .unwrap();

    assert_eq!(records.records()[0].get("ruta_script").unwrap(), "a.sh");
}

#[test]
fn test_header_only_source_is_empty_set() {
    let source = "ip,ruta_script\n";
    let records = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(records.schema().len(), 2);
}

#[test]
fn test_empty_source_rejected() {
    let err = read_records_from("".as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptySource { .. }));
}

#[test]
fn test_duplicate_header_rejected() {
    let source = "ip,ip\n1.1.1.1,2.2.2.2\n";
    let err = read_records_from(source.as_bytes(), Path::new("mem"), ReadOptions::default())
        .unwrap_err();

    match err {
        IngestError::Schema { source, .. } => assert_eq!(
            source,
            ModelError::DuplicateField {
                field: "ip".to_string()
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_utf8_rejected() {
    let bytes: &[u8] = b"ip,ruta_script\n\xff\xfe,a.sh\n";
    let err = read_records_from(bytes, Path::new("mem"), ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::CsvParse { .. }));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_records(&dir.path().join("absent.csv"), ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
