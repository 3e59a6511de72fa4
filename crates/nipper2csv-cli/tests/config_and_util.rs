//! Integration tests for CLI config loading and argument helpers.

use nipper2csv_cli::convert::input::{load_flatten_config, parse_delimiter, ConvertConfig};
use nipper2csv_core::FlattenConfig;

// ---------------------------------------------------------------------------
// load_flatten_config
// ---------------------------------------------------------------------------

#[test]
fn full_config_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"delimiter": ";", "step_separator": " / ", "note_separator": "|"}"#,
    )
    .unwrap();

    let cfg = load_flatten_config(&path).unwrap();
    assert_eq!(cfg.delimiter, Some(';'));
    assert_eq!(cfg.step_separator, " / ");
    assert_eq!(cfg.note_separator, "|");
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"step_separator": "; "}"#).unwrap();

    let cfg = load_flatten_config(&path).unwrap();
    assert_eq!(cfg.delimiter, None);
    assert_eq!(cfg.step_separator, "; ");
    assert_eq!(cfg.note_separator, FlattenConfig::default().note_separator);
}

#[test]
fn invalid_field_values_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"delimiter": 42, "unknown": true}"#).unwrap();

    let cfg = load_flatten_config(&path).unwrap();
    assert_eq!(cfg, FlattenConfig::default());
}

#[test]
fn malformed_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_flatten_config(&path).is_err());
}

#[test]
fn nonexistent_config_errors() {
    assert!(load_flatten_config("/nonexistent/config.json").is_err());
}

// ---------------------------------------------------------------------------
// parse_delimiter
// ---------------------------------------------------------------------------

#[test]
fn delimiter_accepts_single_characters_and_tab_aliases() {
    assert_eq!(parse_delimiter(",").unwrap(), ',');
    assert_eq!(parse_delimiter("tab").unwrap(), '\t');
    assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
    assert!(parse_delimiter(",,").is_err());
}

// ---------------------------------------------------------------------------
// ConvertConfig defaults & serialization
// ---------------------------------------------------------------------------

#[test]
fn convert_config_default_values() {
    let cfg = ConvertConfig::default();
    assert_eq!(cfg.flatten, FlattenConfig::default());
    assert_eq!(cfg.flatten.step_separator, "\n");
    assert!(!cfg.version.is_empty());
}

#[test]
fn convert_config_serializes() {
    let json = serde_json::to_string(&ConvertConfig::default()).unwrap();
    assert!(json.contains("step_separator"));
    assert!(json.contains("output"));
}
