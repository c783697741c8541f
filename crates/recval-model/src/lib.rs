pub mod diagnostics;
pub mod error;
pub mod options;
pub mod record;
pub mod validation;

pub use diagnostics::{
    Diagnostic, DiagnosticsSink, MemorySink, PipelineState, SkipReason,
};
pub use error::{ModelError, Result};
pub use options::{
    CsvExportConfig, DEFAULT_ADDRESS_FIELD, DEFAULT_DATE_FORMAT, DEFAULT_SCRIPT_FIELD,
    ExportConfig, FileConfig, JsonExportConfig, LoggingConfig, PipelineConfig, ValidatorConfig,
    ValidatorKind, XmlExportConfig,
};
pub use record::{Record, RecordSet, Schema};
pub use validation::{FieldCheck, PartitionKind, PartitionResult, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_config_collects_parameters() {
        let json = r#"{
            "habilitada": true,
            "extension": ".py",
            "mensaje_error": "solo python"
        }"#;
        let config: ValidatorConfig = serde_json::from_str(json).expect("deserialize");
        assert!(config.enabled);
        assert_eq!(config.parameter("extension"), Some(".py"));
        assert_eq!(config.error_message.as_deref(), Some("solo python"));
        assert_eq!(config.kind, None);
    }

    #[test]
    fn pipeline_config_defaults() {
        let json = r#"{
            "archivos": {
                "entrada": "datos.csv",
                "validos": "validos.csv",
                "invalidos": "invalidos.csv"
            }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.validations.len(), 2);
        assert!(config.validations.contains_key(DEFAULT_ADDRESS_FIELD));
        assert!(config.validations.contains_key(DEFAULT_SCRIPT_FIELD));
        assert!(!config.export.xml.enabled);
        assert_eq!(config.export.xml.root_tag, "datos");
        assert_eq!(config.export.xml.row_tag, "fila");
        assert!(config.export.json.include_metadata);
        assert_eq!(config.export.json.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.export.csv.delimiter_byte(), Some(b','));
        assert!(!config.export.abort_on_error);
    }

    #[test]
    fn kind_binding() {
        let config = ValidatorConfig::default();
        assert_eq!(config.resolve_kind("ip"), Some(ValidatorKind::Ipv4));
        assert_eq!(
            config.resolve_kind("ruta_script"),
            Some(ValidatorKind::Extension)
        );
        assert_eq!(config.resolve_kind("host"), None);
        let explicit = ValidatorConfig::default().with_kind(ValidatorKind::Ipv4);
        assert_eq!(explicit.resolve_kind("gateway"), Some(ValidatorKind::Ipv4));
    }

    #[test]
    fn default_fields_round_trip() {
        for kind in ValidatorKind::ALL {
            assert_eq!(ValidatorKind::default_for_field(kind.default_field()), Some(kind));
        }
        assert_eq!(ValidatorKind::Ipv4.default_field(), DEFAULT_ADDRESS_FIELD);
        assert_eq!(ValidatorKind::Extension.default_field(), DEFAULT_SCRIPT_FIELD);
    }

    #[test]
    fn partition_kind_serializes_lowercase() {
        let json = serde_json::to_string(&PartitionKind::Invalid).expect("serialize");
        assert_eq!(json, "\"invalid\"");
    }
}
