//! Configuration management
//!
//! Layered configuration through Figment: defaults, then a TOML file, then
//! `TGOV__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
