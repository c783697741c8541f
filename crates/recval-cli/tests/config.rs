//! Integration tests for configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use recval_cli::config::{ConfigError, load_config, parse_config};
use recval_model::ValidatorKind;
use recval_validate::ValidatorSet;

const FULL: &str = r#"
[archivos]
entrada = "datos.csv"
validos = "datos_validos.csv"
invalidos = "datos_invalidos.csv"
xml_validos = "datos_validos.xml"
xml_invalidos = "datos_invalidos.xml"
json_validos = "datos_validos.json"
json_invalidos = "datos_invalidos.json"

[logging]
nivel = "WARNING"
archivo = "validacion.log"

[validaciones.ip]
habilitada = true
mensaje_error = "IP inválida"

[validaciones.ruta_script]
extension = ".py"

[validaciones.servidor]
tipo = "ipv4"
habilitada = false

[exportacion]
abortar_en_error = true

[exportacion.csv]
delimitador = ";"

[exportacion.xml]
habilitada = true
elemento_raiz = "servidores"
elemento_fila = "servidor"
atributos = false
indentacion = 4

[exportacion.json]
habilitada = true
incluir_metadatos = false
formato_fecha = "%d/%m/%Y"
"#;

const MINIMAL: &str = r#"
[archivos]
entrada = "datos.csv"
validos = "validos.csv"
invalidos = "invalidos.csv"
"#;

fn parse(text: &str) -> Result<recval_model::PipelineConfig, ConfigError> {
    parse_config(text, Path::new("recval.toml"))
}

fn invalid_key(text: &str) -> String {
    match parse(text) {
        Err(ConfigError::Invalid { key, .. }) => key,
        other => panic!("expected an invalid setting, got {other:?}"),
    }
}

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recval.toml");
    fs::write(&path, FULL).unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.files.input, PathBuf::from("datos.csv"));
    assert_eq!(
        config.files.invalid_json,
        Some(PathBuf::from("datos_invalidos.json"))
    );
    assert_eq!(config.logging.level.as_deref(), Some("WARNING"));
    assert_eq!(config.export.csv.delimiter_byte(), Some(b';'));
    assert!(config.export.abort_on_error);
    assert_eq!(config.export.xml.root_tag, "servidores");
    assert!(!config.export.xml.attributes);
    assert_eq!(config.export.xml.indent, 4);
    assert!(!config.export.json.include_metadata);
    assert_eq!(config.export.json.indent, 2);

    let script = &config.validations["ruta_script"];
    assert!(script.enabled);
    assert_eq!(script.parameter("extension"), Some(".py"));

    let validators = ValidatorSet::from_config(&config.validations).unwrap();
    let bound: Vec<(&str, ValidatorKind, bool)> = validators
        .rules()
        .iter()
        .map(|rule| (rule.field.as_str(), rule.kind, rule.config.enabled))
        .collect();
    assert_eq!(
        bound,
        vec![
            ("ip", ValidatorKind::Ipv4, true),
            ("ruta_script", ValidatorKind::Extension, true),
            ("servidor", ValidatorKind::Ipv4, false),
        ]
    );
}

#[test]
fn test_minimal_config_defaults() {
    let config = parse(MINIMAL).unwrap();

    assert_eq!(config.validations.len(), 2);
    assert!(config.validations.contains_key("ip"));
    assert!(config.validations.contains_key("ruta_script"));
    assert!(!config.export.xml.enabled);
    assert!(!config.export.json.enabled);
    assert!(!config.export.abort_on_error);
    assert_eq!(config.export.csv.delimiter, ",");
    assert_eq!(config.export.xml.row_tag, "fila");
    assert_eq!(config.export.json.date_format, "%Y-%m-%d %H:%M:%S");
    assert_eq!(config.logging.level, None);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_config(&dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_missing_required_key() {
    let text = "[archivos]\nentrada = \"datos.csv\"\nvalidos = \"v.csv\"\n";

    let err = parse(text).unwrap_err();

    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("invalidos"));
}

#[test]
fn test_malformed_toml() {
    assert!(matches!(
        parse("[archivos\nentrada = 1"),
        Err(ConfigError::Toml { .. })
    ));
}

#[test]
fn test_unknown_log_level() {
    let text = format!("{MINIMAL}\n[logging]\nnivel = \"VERBOSE\"\n");
    assert_eq!(invalid_key(&text), "logging.nivel");
}

#[test]
fn test_unbound_field() {
    let text = format!("{MINIMAL}\n[validaciones.puerto]\nhabilitada = true\n");
    assert_eq!(invalid_key(&text), "validaciones.puerto");
}

#[test]
fn test_empty_extension() {
    let text = format!("{MINIMAL}\n[validaciones.ruta_script]\nextension = \"\"\n");
    assert_eq!(invalid_key(&text), "validaciones.ruta_script.extension");
}

#[test]
fn test_delimiter_must_be_one_ascii_character() {
    let text = format!("{MINIMAL}\n[exportacion.csv]\ndelimitador = \"::\"\n");
    assert_eq!(invalid_key(&text), "exportacion.csv.delimitador");
}

#[test]
fn test_enabled_xml_requires_paths() {
    let text = format!("{MINIMAL}\n[exportacion.xml]\nhabilitada = true\n");
    assert_eq!(invalid_key(&text), "archivos.xml_validos");
}

#[test]
fn test_invalid_root_tag() {
    let text = format!(
        "{MINIMAL}xml_validos = \"v.xml\"\nxml_invalidos = \"i.xml\"\n\
         [exportacion.xml]\nhabilitada = true\nelemento_raiz = \"mis datos\"\n"
    );
    assert_eq!(invalid_key(&text), "exportacion.xml.elemento_raiz");
}

#[test]
fn test_indent_limit() {
    let text = format!("{MINIMAL}\n[exportacion.json]\nindentacion = 17\n");
    assert_eq!(invalid_key(&text), "exportacion.json.indentacion");
}

#[test]
fn test_invalid_date_format() {
    let text = format!(
        "{MINIMAL}json_validos = \"v.json\"\njson_invalidos = \"i.json\"\n\
         [exportacion.json]\nhabilitada = true\nformato_fecha = \"%Q\"\n"
    );
    assert_eq!(invalid_key(&text), "exportacion.json.formato_fecha");
}
