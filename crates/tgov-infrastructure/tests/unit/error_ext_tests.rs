//! Error Extension Tests

use std::io;
use tgov_domain::error::{Error, Result};
use tgov_infrastructure::error_ext::ErrorContext;

#[test]
fn test_io_context() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).io_context("failed to read file");
    if let Err(Error::Io { source, message }) = result {
        assert!(message.contains("failed to read file"));
        assert!(message.contains("file not found"));
        assert!(source.is_some());
    } else {
        panic!("Expected Io error");
    }
}

#[test]
fn test_config_context() {
    let parse_error = "abc".parse::<u64>().unwrap_err();

    let result: Result<u64> = Err(parse_error).config_context("invalid max_local_items");
    match result {
        Err(Error::Configuration { message, source }) => {
            assert!(message.starts_with("invalid max_local_items: "));
            assert!(source.is_some());
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_ok_passes_through() {
    let ok: std::result::Result<u8, io::Error> = Ok(7);
    assert_eq!(ok.io_context("unused").unwrap(), 7);
}
