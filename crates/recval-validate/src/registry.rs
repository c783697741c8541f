use std::collections::BTreeMap;

use recval_model::{FieldCheck, Schema, ValidatorConfig, ValidatorKind};

use crate::error::{Result, ValidateError};
use crate::validators::validate_field;

/// A validator bound to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub kind: ValidatorKind,
    pub config: ValidatorConfig,
}

impl FieldRule {
    pub fn check(&self, value: &str) -> FieldCheck {
        validate_field(self.kind, value, &self.config)
    }
}

/// Registered `(field, validator)` pairs, applied in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    rules: Vec<FieldRule>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from per-field configuration. Fields are registered in
    /// key order, which fixes the order of reported errors.
    pub fn from_config(validations: &BTreeMap<String, ValidatorConfig>) -> Result<Self> {
        let mut set = Self::new();
        for (field, config) in validations {
            let kind = config
                .resolve_kind(field)
                .ok_or_else(|| ValidateError::UnboundField {
                    field: field.clone(),
                })?;
            set.register(field.clone(), kind, config.clone());
        }
        Ok(set)
    }

    /// Bind `kind` to `field`, replacing any earlier rule for that field.
    pub fn register(
        &mut self,
        field: impl Into<String>,
        kind: ValidatorKind,
        config: ValidatorConfig,
    ) -> &mut Self {
        let field = field.into();
        let rule = FieldRule {
            field,
            kind,
            config,
        };
        match self.rules.iter_mut().find(|r| r.field == rule.field) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Enabled rules; disabled ones pass without reading the record.
    pub fn enabled(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter().filter(|rule| rule.config.enabled)
    }

    /// Ensure every enabled rule targets a field present in `schema`.
    pub fn check_schema(&self, schema: &Schema) -> Result<()> {
        for rule in self.enabled() {
            schema.index_of(&rule.field)?;
        }
        Ok(())
    }
}
