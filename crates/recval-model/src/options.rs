//! Resolved configuration for a pipeline run.
//!
//! The serde names are the keys of the external configuration file; the Rust
//! field names describe what each setting controls. Structural checks that
//! need more than deserialization (tag names, date formats, required paths for
//! enabled exports) run once at load time in the CLI crate.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default timestamp format of the structured-document metadata block.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field names that bind to a validator without an explicit `tipo`.
pub const DEFAULT_ADDRESS_FIELD: &str = "ip";
pub const DEFAULT_SCRIPT_FIELD: &str = "ruta_script";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(rename = "archivos")]
    pub files: FileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(rename = "validaciones", default = "default_validations")]
    pub validations: BTreeMap<String, ValidatorConfig>,
    #[serde(rename = "exportacion", default)]
    pub export: ExportConfig,
}

impl PipelineConfig {
    /// Configuration with default rules and exports for the given paths.
    pub fn new(files: FileConfig) -> Self {
        Self {
            files,
            logging: LoggingConfig::default(),
            validations: default_validations(),
            export: ExportConfig::default(),
        }
    }
}

/// Source and destination paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "entrada")]
    pub input: PathBuf,
    #[serde(rename = "validos")]
    pub valid_csv: PathBuf,
    #[serde(rename = "invalidos")]
    pub invalid_csv: PathBuf,
    #[serde(rename = "xml_validos", default)]
    pub valid_xml: Option<PathBuf>,
    #[serde(rename = "xml_invalidos", default)]
    pub invalid_xml: Option<PathBuf>,
    #[serde(rename = "json_validos", default)]
    pub valid_json: Option<PathBuf>,
    #[serde(rename = "json_invalidos", default)]
    pub invalid_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(rename = "nivel", default)]
    pub level: Option<String>,
    #[serde(rename = "archivo", default)]
    pub file: Option<PathBuf>,
}

/// Built-in field validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Dotted-decimal IPv4 address.
    Ipv4,
    /// Value must end with a configured suffix.
    Extension,
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 2] = [ValidatorKind::Ipv4, ValidatorKind::Extension];

    pub fn as_str(self) -> &'static str {
        match self {
            ValidatorKind::Ipv4 => "ipv4",
            ValidatorKind::Extension => "extension",
        }
    }

    /// Field this validator is bound to when no `tipo` is configured.
    pub fn default_field(self) -> &'static str {
        match self {
            ValidatorKind::Ipv4 => DEFAULT_ADDRESS_FIELD,
            ValidatorKind::Extension => DEFAULT_SCRIPT_FIELD,
        }
    }

    /// Validator bound to `field` when its configuration names no `tipo`.
    pub fn default_for_field(field: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.default_field() == field)
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(rename = "habilitada", default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidatorKind>,
    #[serde(
        rename = "mensaje_error",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    /// Validator-specific settings such as `extension`.
    #[serde(flatten)]
    pub parameters: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: None,
            error_message: None,
            parameters: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ValidatorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Explicit `tipo`, falling back to the binding for well-known fields.
    pub fn resolve_kind(&self, field: &str) -> Option<ValidatorKind> {
        self.kind.or_else(|| ValidatorKind::default_for_field(field))
    }
}

fn default_validations() -> BTreeMap<String, ValidatorConfig> {
    let mut rules = BTreeMap::new();
    rules.insert(DEFAULT_ADDRESS_FIELD.to_string(), ValidatorConfig::default());
    rules.insert(DEFAULT_SCRIPT_FIELD.to_string(), ValidatorConfig::default());
    rules
}

/// Export settings for all formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Abort remaining exports after the first failure.
    #[serde(rename = "abortar_en_error", default)]
    pub abort_on_error: bool,
    #[serde(default)]
    pub csv: CsvExportConfig,
    #[serde(default)]
    pub xml: XmlExportConfig,
    #[serde(default)]
    pub json: JsonExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExportConfig {
    #[serde(rename = "delimitador", default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for CsvExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl CsvExportConfig {
    /// The delimiter as a single byte, if it is exactly one ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlExportConfig {
    #[serde(rename = "habilitada", default)]
    pub enabled: bool,
    #[serde(rename = "elemento_raiz", default = "default_root_tag")]
    pub root_tag: String,
    #[serde(rename = "elemento_fila", default = "default_row_tag")]
    pub row_tag: String,
    /// Fields as attributes of the row element instead of child elements.
    #[serde(rename = "atributos", default = "default_true")]
    pub attributes: bool,
    #[serde(rename = "indentacion", default = "default_indent")]
    pub indent: usize,
}

impl Default for XmlExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            root_tag: default_root_tag(),
            row_tag: default_row_tag(),
            attributes: true,
            indent: default_indent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonExportConfig {
    #[serde(rename = "habilitada", default)]
    pub enabled: bool,
    #[serde(rename = "incluir_metadatos", default = "default_true")]
    pub include_metadata: bool,
    #[serde(rename = "formato_fecha", default = "default_date_format")]
    pub date_format: String,
    #[serde(rename = "indentacion", default = "default_indent")]
    pub indent: usize,
}

impl Default for JsonExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            include_metadata: true,
            date_format: default_date_format(),
            indent: default_indent(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_indent() -> usize {
    2
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_root_tag() -> String {
    "datos".to_string()
}

fn default_row_tag() -> String {
    "fila".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
