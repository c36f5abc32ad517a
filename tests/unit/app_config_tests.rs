/*!
 * Tests for configuration loading and validation
 */

use subfix::app_config::{Config, LogLevel};

use crate::common;

#[test]
fn test_config_default_shouldPassValidation() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.min_duration_ms, 500);
    assert_eq!(config.context_window, 3);
    assert_eq!(config.chinese_cache_capacity, 1024);
    assert_eq!(config.english_cache_capacity, 512);
    assert!(!config.enable_grammar);
    assert!(!config.preserve_numbering);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_fromFile_withFullJson_shouldLoadEveryField() {
    let dir = common::create_temp_dir().unwrap();
    let content = r#"{
        "min_duration_ms": 800,
        "context_window": 5,
        "enable_grammar": true,
        "preserve_numbering": true,
        "terminal_punctuation": [".", "!", "?"],
        "typo_map": {"好把": "好吧"},
        "grammar": {
            "endpoint": "http://localhost:9010",
            "language": "en-GB",
            "timeout_secs": 5
        },
        "log_level": "debug"
    }"#;
    let path = common::create_test_file(dir.path(), "conf.json", content).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.min_duration_ms, 800);
    assert_eq!(config.context_window, 5);
    assert!(config.enable_grammar);
    assert!(config.preserve_numbering);
    assert_eq!(config.terminal_punctuation, vec!['.', '!', '?']);
    assert_eq!(config.typo_map.get("好把").map(String::as_str), Some("好吧"));
    assert_eq!(config.grammar.endpoint, "http://localhost:9010");
    assert_eq!(config.grammar.language, "en-GB");
    assert_eq!(config.grammar.timeout_secs, 5);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_config_fromFile_withPartialJson_shouldUseDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_file(dir.path(), "conf.json", r#"{"min_duration_ms": 600}"#).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.min_duration_ms, 600);
    assert_eq!(config.context_window, 3);
    assert_eq!(config.grammar.endpoint, "http://localhost:8010");
}

#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_fromFile_withInvalidValues_shouldFailValidation() {
    let dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_file(dir.path(), "conf.json", r#"{"min_duration_ms": 0}"#).unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_fromOptionalFile_withNone_shouldUseDefaults() {
    let config = Config::from_optional_file(None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_validate_withGrammarEnabledAndEmptyEndpoint_shouldFail() {
    let mut config = Config::default();
    config.enable_grammar = true;
    config.grammar.endpoint = String::new();

    assert!(config.validate().is_err());
}
