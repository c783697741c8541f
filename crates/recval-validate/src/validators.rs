//! Field validators.
//!
//! Each validator is a pure function of one value and its configuration. A
//! disabled configuration always passes.

use std::net::Ipv4Addr;

use recval_model::{FieldCheck, ValidatorConfig, ValidatorKind};

/// Suffix required by the extension validator when none is configured.
pub const DEFAULT_EXTENSION: &str = ".sh";

/// Parameter key holding the required suffix.
pub const EXTENSION_PARAMETER: &str = "extension";

/// Message reported for a rejected address when none is configured.
pub const DEFAULT_ADDRESS_MESSAGE: &str = "IP inválida";

fn default_extension_message(extension: &str) -> String {
    format!("Debe terminar en {extension}")
}

/// Accept dotted-decimal IPv4 addresses only: four octets in 0..=255 with
/// nothing before or after.
pub fn validate_ipv4(value: &str, config: &ValidatorConfig) -> FieldCheck {
    if !config.enabled {
        return FieldCheck::Pass;
    }
    if value.parse::<Ipv4Addr>().is_ok() {
        FieldCheck::Pass
    } else {
        FieldCheck::fail(
            config
                .error_message
                .as_deref()
                .unwrap_or(DEFAULT_ADDRESS_MESSAGE),
        )
    }
}

/// Accept values ending with the configured `extension` (default `.sh`).
pub fn validate_extension(value: &str, config: &ValidatorConfig) -> FieldCheck {
    if !config.enabled {
        return FieldCheck::Pass;
    }
    let extension = config
        .parameter(EXTENSION_PARAMETER)
        .unwrap_or(DEFAULT_EXTENSION);
    if value.ends_with(extension) {
        FieldCheck::Pass
    } else {
        FieldCheck::fail(
            config
                .error_message
                .clone()
                .unwrap_or_else(|| default_extension_message(extension)),
        )
    }
}

/// Dispatch to the validator implementing `kind`.
pub fn validate_field(kind: ValidatorKind, value: &str, config: &ValidatorConfig) -> FieldCheck {
    match kind {
        ValidatorKind::Ipv4 => validate_ipv4(value, config),
        ValidatorKind::Extension => validate_extension(value, config),
    }
}

/// One-line description used by the CLI validator listing.
pub fn describe(kind: ValidatorKind) -> &'static str {
    match kind {
        ValidatorKind::Ipv4 => "dotted-decimal IPv4 address (four octets, 0-255)",
        ValidatorKind::Extension => "value ends with the configured `extension` (default .sh)",
    }
}
