use recval_model::{FieldCheck, Record, ValidationError};

use crate::error::Result;
use crate::registry::ValidatorSet;

/// Result of running every enabled validator against one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordValidation {
    pub errors: Vec<ValidationError>,
}

impl RecordValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `record` against every enabled rule without stopping at the
/// first failure. Errors follow rule registration order.
pub fn validate_record(record: &Record, validators: &ValidatorSet) -> Result<RecordValidation> {
    let mut errors = Vec::new();
    for rule in validators.enabled() {
        let value = record.get(&rule.field)?;
        if let FieldCheck::Fail { message } = rule.check(value) {
            errors.push(ValidationError {
                row: record.position(),
                field: rule.field.clone(),
                value: value.to_string(),
                message,
            });
        }
    }
    Ok(RecordValidation { errors })
}
