//! Configuration loading and eager validation.
//!
//! The configuration file is TOML. Everything that can be checked without
//! reading records is checked here, so a bad setting stops the run before the
//! source is opened.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use recval_model::{PipelineConfig, ValidatorKind};
use recval_output::{check_date_format, is_xml_name};
use recval_validate::EXTENSION_PARAMETER;

use crate::logging::level_from_name;

/// Largest accepted indentation width for the XML and JSON exports.
pub const MAX_INDENT: usize = 16;

/// Errors raised while loading or checking the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting is present but unusable.
    #[error("invalid configuration `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Read, parse and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text, path)?;
    debug!(path = %path.display(), rules = config.validations.len(), "configuration loaded");
    Ok(config)
}

/// Parse and validate configuration text; `origin` only labels errors.
pub fn parse_config(text: &str, origin: &Path) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Check every setting that does not depend on the records.
pub fn validate_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if let Some(level) = &config.logging.level
        && level_from_name(level).is_none()
    {
        return Err(ConfigError::invalid(
            "logging.nivel",
            format!("unknown level '{level}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)"),
        ));
    }

    for (field, rule) in &config.validations {
        let Some(kind) = rule.resolve_kind(field) else {
            return Err(ConfigError::invalid(
                format!("validaciones.{field}"),
                "no `tipo` given and the field has no default validator",
            ));
        };
        if kind == ValidatorKind::Extension
            && rule
                .parameter(EXTENSION_PARAMETER)
                .is_some_and(str::is_empty)
        {
            return Err(ConfigError::invalid(
                format!("validaciones.{field}.{EXTENSION_PARAMETER}"),
                "must not be empty",
            ));
        }
    }

    csv_delimiter(config)?;

    let xml = &config.export.xml;
    check_indent("exportacion.xml.indentacion", xml.indent)?;
    if xml.enabled {
        check_tag("exportacion.xml.elemento_raiz", &xml.root_tag)?;
        check_tag("exportacion.xml.elemento_fila", &xml.row_tag)?;
        require_path("archivos.xml_validos", config.files.valid_xml.as_deref())?;
        require_path("archivos.xml_invalidos", config.files.invalid_xml.as_deref())?;
    }

    let json = &config.export.json;
    check_indent("exportacion.json.indentacion", json.indent)?;
    if json.enabled {
        check_date_format(&json.date_format).map_err(|error| {
            ConfigError::invalid("exportacion.json.formato_fecha", error.to_string())
        })?;
        require_path("archivos.json_validos", config.files.valid_json.as_deref())?;
        require_path("archivos.json_invalidos", config.files.invalid_json.as_deref())?;
    }
    Ok(())
}

/// The configured delimiter as a byte; used for reading and writing.
pub fn csv_delimiter(config: &PipelineConfig) -> Result<u8, ConfigError> {
    config.export.csv.delimiter_byte().ok_or_else(|| {
        ConfigError::invalid(
            "exportacion.csv.delimitador",
            format!(
                "'{}' is not a single ASCII character",
                config.export.csv.delimiter
            ),
        )
    })
}

fn check_indent(key: &str, indent: usize) -> Result<(), ConfigError> {
    if indent > MAX_INDENT {
        return Err(ConfigError::invalid(
            key,
            format!("{indent} exceeds the maximum of {MAX_INDENT}"),
        ));
    }
    Ok(())
}

fn check_tag(key: &str, name: &str) -> Result<(), ConfigError> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("'{name}' is not a valid XML name"),
        ))
    }
}

fn require_path(key: &str, path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => Ok(()),
        _ => Err(ConfigError::invalid(
            key,
            "required when the export is enabled",
        )),
    }
}

/// Command-line settings that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `archivos.entrada`.
    pub input: Option<PathBuf>,
    /// Prefixes every relative output path.
    pub output_dir: Option<PathBuf>,
    /// Forces `exportacion.abortar_en_error`.
    pub fail_fast: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.files.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            let files = &mut config.files;
            prefix_relative(dir, &mut files.valid_csv);
            prefix_relative(dir, &mut files.invalid_csv);
            for path in [
                &mut files.valid_xml,
                &mut files.invalid_xml,
                &mut files.valid_json,
                &mut files.invalid_json,
            ]
            .into_iter()
            .flatten()
            {
                prefix_relative(dir, path);
            }
        }
        if self.fail_fast {
            config.export.abort_on_error = true;
        }
    }
}

fn prefix_relative(dir: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = dir.join(&*path);
    }
}
