//! Shared utilities and types for record export.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xml,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an exporter did with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file was written with `records` entries.
    Written { path: PathBuf, records: usize },
    /// No records: nothing was written.
    Skipped { path: PathBuf },
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::io(parent, source))?;
    }
    Ok(())
}

/// Whether `name` can be used as an XML element or attribute name.
///
/// Namespaced (`a:b`) names are rejected.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

pub(crate) fn require_xml_name(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(ExportError::InvalidName {
            name: name.to_string(),
        })
    }
}
