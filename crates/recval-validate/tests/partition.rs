//! Integration tests for partitioning record sets.

use std::sync::Arc;

use proptest::prelude::*;

use recval_model::{ModelError, RecordSet, Schema, ValidatorConfig, ValidatorKind};
use recval_validate::{ValidateError, ValidatorSet, partition};

fn default_validators() -> ValidatorSet {
    let mut set = ValidatorSet::new();
    set.register("ip", ValidatorKind::Ipv4, ValidatorConfig::default())
        .register("ruta_script", ValidatorKind::Extension, ValidatorConfig::default());
    set
}

fn record_set(rows: &[(&str, &str)]) -> RecordSet {
    let schema = Arc::new(Schema::new(["ip", "ruta_script"]).unwrap());
    let mut set = RecordSet::new(schema);
    for (ip, script) in rows {
        set.push_values(vec![ip.to_string(), script.to_string()])
            .unwrap();
    }
    set
}

#[test]
fn test_three_record_scenario() {
    let records = record_set(&[
        ("192.168.1.1", "/opt/deploy.sh"),
        ("999.1.1.1", "/opt/backup.sh"),
        ("10.0.0.5", "/opt/report.py"),
    ]);

    let result = partition(records, &default_validators()).unwrap();

    let valid: Vec<usize> = result.valid.iter().map(|r| r.position()).collect();
    let invalid: Vec<usize> = result.invalid.iter().map(|r| r.position()).collect();
    assert_eq!(valid, vec![1]);
    assert_eq!(invalid, vec![2, 3]);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].row, 2);
    assert_eq!(result.errors[0].field, "ip");
    assert_eq!(result.errors[0].value, "999.1.1.1");
    assert_eq!(result.errors[1].row, 3);
    assert_eq!(result.errors[1].field, "ruta_script");
    assert_eq!(result.total(), 3);
}

#[test]
fn test_empty_input_is_not_an_error() {
    let result = partition(record_set(&[]), &default_validators()).unwrap();

    assert!(result.valid.is_empty());
    assert!(result.invalid.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(result.valid.schema().fields(), ["ip", "ruta_script"]);
}

#[test]
fn test_record_with_two_failures_counted_once() {
    let records = record_set(&[("abc", "x.py"), ("1.1.1.1", "ok.sh")]);

    let result = partition(records, &default_validators()).unwrap();

    assert_eq!(result.invalid.len(), 1);
    assert_eq!(result.valid.len(), 1);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|error| error.row == 1));
}

#[test]
fn test_missing_field_fails_before_validation() {
    let schema = Arc::new(Schema::new(["address", "ruta_script"]).unwrap());
    let mut records = RecordSet::new(schema);
    records
        .push_values(vec!["1.1.1.1".into(), "a.sh".into()])
        .unwrap();

    let err = partition(records, &default_validators()).unwrap_err();
    assert_eq!(
        err,
        ValidateError::Schema(ModelError::FieldNotFound {
            field: "ip".to_string()
        })
    );
}

#[test]
fn test_records_are_not_modified() {
    let source = record_set(&[("1.1.1.1", "a.sh"), ("bad", "b.sh")]);
    let result = partition(source.clone(), &default_validators()).unwrap();

    assert_eq!(&result.valid.records()[0], &source.records()[0]);
    assert_eq!(&result.invalid.records()[0], &source.records()[1]);
}

fn row_strategy() -> impl Strategy<Value = (String, String)> {
    let ip = prop_oneof![
        (0u16..=300, 0u16..=255, 0u16..=255, 0u16..=255)
            .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}")),
        "[a-z0-9.]{0,12}",
    ];
    let script = prop_oneof![
        "[a-z/]{1,10}\\.sh",
        "[a-z/]{1,10}\\.(py|rb|txt)",
    ];
    (ip, script)
}

proptest! {
    #[test]
    fn prop_partition_conserves_records(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let borrowed: Vec<(&str, &str)> =
            rows.iter().map(|(ip, script)| (ip.as_str(), script.as_str())).collect();
        let source = record_set(&borrowed);
        let result = partition(source.clone(), &default_validators()).unwrap();

        prop_assert_eq!(result.valid.len() + result.invalid.len(), source.len());

        // Each position appears exactly once, and each side keeps source order.
        let mut positions: Vec<usize> = result
            .valid
            .iter()
            .chain(result.invalid.iter())
            .map(|record| record.position())
            .collect();
        let valid_positions: Vec<usize> = result.valid.iter().map(|r| r.position()).collect();
        let invalid_positions: Vec<usize> = result.invalid.iter().map(|r| r.position()).collect();
        prop_assert!(valid_positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(invalid_positions.windows(2).all(|w| w[0] < w[1]));
        positions.sort_unstable();
        let expected: Vec<usize> = (1..=source.len()).collect();
        prop_assert_eq!(positions, expected);

        // Errors only reference invalid rows, and every invalid row has one.
        for error in &result.errors {
            prop_assert!(invalid_positions.contains(&error.row));
        }
        for position in &invalid_positions {
            prop_assert!(result.errors.iter().any(|error| error.row == *position));
        }
    }
}
