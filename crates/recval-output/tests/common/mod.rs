//! Shared fixtures for exporter tests.

#![allow(dead_code)]

use std::sync::Arc;

use recval_model::{RecordSet, Schema};

/// Build a record set from a header and rows of string values.
pub fn record_set(fields: &[&str], rows: &[&[&str]]) -> RecordSet {
    let schema = Arc::new(Schema::new(fields.iter().copied()).unwrap());
    let mut set = RecordSet::new(schema);
    for row in rows {
        set.push_values(row.iter().map(|value| value.to_string()).collect())
            .unwrap();
    }
    set
}

pub fn servers() -> RecordSet {
    record_set(
        &["ip", "ruta_script", "port"],
        &[
            &["192.168.1.1", "/opt/deploy.sh", "22"],
            &["10.0.0.7", "/opt/backup.sh", "2222"],
        ],
    )
}

pub fn empty() -> RecordSet {
    record_set(&["ip", "ruta_script"], &[])
}
