use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RecordSet;

/// Outcome of a single field validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Pass,
    Fail { message: String },
}

impl FieldCheck {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Failure message, empty for a passing check.
    pub fn message(&self) -> &str {
        match self {
            Self::Pass => "",
            Self::Fail { message } => message,
        }
    }
}

/// A failed field check, collected as data rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based source position of the offending record.
    pub row: usize,
    pub field: String,
    pub value: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} = {:?}: {}",
            self.row, self.field, self.value, self.message
        )
    }
}

/// Which side of the partition a record collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Valid,
    Invalid,
}

impl PartitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PartitionKind::Valid => "valid",
            PartitionKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records split by validity, plus every failure found along the way.
///
/// Every source record lands in exactly one of the two sets, each set keeps
/// source order, and `errors` only refers to rows in `invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionResult {
    pub valid: RecordSet,
    pub invalid: RecordSet,
    pub errors: Vec<ValidationError>,
}

impl PartitionResult {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn records(&self, kind: PartitionKind) -> &RecordSet {
        match kind {
            PartitionKind::Valid => &self.valid,
            PartitionKind::Invalid => &self.invalid,
        }
    }
}
