//! Configuration types module

pub mod app;
pub mod cache;
pub mod governor;
pub mod logging;

// Re-export main types
pub use app::*;
