//! Unit tests for domain error types

use tgov_domain::Error;

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("No limits provided");
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "No limits provided"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_timeout_error_display() {
    let error = Error::timeout("redis GET", 500);
    assert_eq!(
        error.to_string(),
        "Operation timed out after 500ms: redis GET"
    );
}

#[test]
fn test_infrastructure_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = Error::infrastructure_with_source("connect failed", io);
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.to_string().contains("connect failed"));
}

#[test]
fn test_configuration_error() {
    let error = Error::configuration("bad interval");
    match error {
        Error::Configuration { message, source } => {
            assert_eq!(message, "bad interval");
            assert!(source.is_none());
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_json_conversion() {
    let json_err = serde_json::from_str::<u32>("x").unwrap_err();
    let error: Error = json_err.into();
    assert!(matches!(error, Error::Json { .. }));
}
