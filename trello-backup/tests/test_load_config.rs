use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use trello_backup::load_config::{load_config, SinkSection, KEY_ENV, TOKEN_ENV};

fn config_file(yaml: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), yaml).unwrap();
    config_file
}

fn set_secrets() {
    env::set_var(KEY_ENV, "key-from-env");
    env::set_var(TOKEN_ENV, "token-from-env");
}

/// A full config file plus env secrets produces the merged config.
#[test]
#[serial]
fn test_load_config_success_with_env_secrets() {
    let config_file = config_file(
        r#"
trello:
  base_url: https://trello.example/1
  min_interval_ms: 250
sink:
  type: local
  output_dir: ./tmp/exports
"#,
    );
    set_secrets();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.trello.base_url, "https://trello.example/1");
    assert_eq!(config.trello.min_interval_ms, 250);
    assert_eq!(
        config.sink,
        SinkSection::Local {
            output_dir: PathBuf::from("./tmp/exports")
        }
    );
    assert_eq!(config.credentials.key, "key-from-env");
    assert_eq!(config.credentials.token, "token-from-env");
    assert!(!format!("{:?}", config.credentials).contains("token-from-env"));
}

/// Omitted sections fall back to the public Trello API and 200ms spacing.
#[test]
#[serial]
fn test_load_config_defaults() {
    let config_file = config_file("sink:\n  type: local\n  output_dir: out\n");
    set_secrets();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.trello.base_url, "https://api.trello.com/1");
    assert_eq!(config.trello.min_interval_ms, 200);
}

#[test]
#[serial]
fn test_load_config_errors_without_token() {
    let config_file = config_file("trello:\n  min_interval_ms: 200\n");
    env::set_var(KEY_ENV, "key-from-env");
    env::remove_var(TOKEN_ENV);

    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains(TOKEN_ENV), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_rejects_zero_interval() {
    let config_file = config_file("trello:\n  min_interval_ms: 0\n");
    set_secrets();

    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("min_interval_ms"), "got: {err}");
}

/// If the config file is not valid YAML, load_config errors and reports as such.
#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let config_file = config_file("not-yaml: [:::");
    set_secrets();

    let msg = load_config(config_file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_errors_for_missing_file() {
    set_secrets();
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
