//! Null distributed cache provider
//!
//! A provider implementation that doesn't store anything.
//! Useful for testing and for running the engine local-only.

use async_trait::async_trait;
use std::time::Duration;
use tgov_domain::error::Result;
use tgov_domain::ports::providers::DistributedCacheProvider;

/// Null cache provider that doesn't store anything
///
/// This provider always returns None for gets and accepts all sets
/// without storing the data.
///
/// # Example
///
/// ```rust
/// use tgov_providers::cache::NullCacheProvider;
///
/// let provider = NullCacheProvider::new();
/// // All operations succeed but nothing is cached
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a new null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DistributedCacheProvider for NullCacheProvider {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64> {
        Ok(0)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}
