use std::time::Instant;

use tracing::{debug, info_span};

use recval_model::{PartitionResult, RecordSet};

use crate::error::Result;
use crate::record::validate_record;
use crate::registry::ValidatorSet;

/// Split `records` into valid and invalid sets in one sequential pass.
///
/// Every record ends up in exactly one set, in source order. An empty input
/// yields two empty sets without consulting the schema; otherwise every
/// enabled rule must target a field of the schema.
pub fn partition(records: RecordSet, validators: &ValidatorSet) -> Result<PartitionResult> {
    let span = info_span!("partition", records = records.len(), rules = validators.len());
    let _guard = span.enter();
    let start = Instant::now();

    let schema = records.shared_schema();
    let mut valid = RecordSet::new(schema.clone());
    let mut invalid = RecordSet::new(schema);
    let mut errors = Vec::new();

    if records.is_empty() {
        return Ok(PartitionResult {
            valid,
            invalid,
            errors,
        });
    }
    validators.check_schema(records.schema())?;

    for record in records.into_records() {
        let outcome = validate_record(&record, validators)?;
        if outcome.is_valid() {
            valid.push(record);
        } else {
            debug!(
                row = record.position(),
                failures = outcome.errors.len(),
                "record rejected"
            );
            errors.extend(outcome.errors);
            invalid.push(record);
        }
    }

    debug!(
        valid = valid.len(),
        invalid = invalid.len(),
        errors = errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "partition complete"
    );
    Ok(PartitionResult {
        valid,
        invalid,
        errors,
    })
}
