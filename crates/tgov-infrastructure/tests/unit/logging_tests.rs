//! Logging Tests

use tempfile::TempDir;
use tgov_infrastructure::constants::{DEFAULT_LOG_LEVEL, LOG_MAX_FILES};
use tgov_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("ERROR").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
    assert_eq!(config.max_files, LOG_MAX_FILES);
}

#[test]
fn test_init_logging_rejects_bad_level() {
    let config = LoggingConfig {
        level: "chatty".to_string(),
        ..Default::default()
    };
    assert!(init_logging(config).is_err());
}

#[test]
fn test_init_logging_installs_once() {
    let dir = TempDir::new().unwrap();
    let config = LoggingConfig {
        level: "debug".to_string(),
        json_format: true,
        file_output: Some(dir.path().join("tgov.log")),
        ..Default::default()
    };

    // The global subscriber can be installed once per process
    let first = init_logging(config.clone());
    let second = init_logging(config);
    assert!(first.is_ok());
    assert!(second.is_err());
}
