//! Cache Factory
//!
//! Builds the distributed tier and the cache engine from configuration.
//! Provider implementations come from `tgov-providers`; this module only
//! does the wiring.

use crate::cache::engine::CacheEngine;
use crate::config::{CacheConfig, DistributedCacheConfig, DistributedProvider};
use std::sync::Arc;
use tgov_domain::error::{Error, Result};
use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};
use tgov_providers::cache::{
    MokaCacheConnector, MokaCacheProvider, RedisCacheConnector, RedisCacheProvider,
};
use tracing::info;

/// Factory for the distributed cache tier
pub struct CacheProviderFactory;

impl CacheProviderFactory {
    /// Create the shared distributed provider, `None` when the tier is off
    pub fn create(
        config: &DistributedCacheConfig,
    ) -> Result<Option<Arc<dyn DistributedCacheProvider>>> {
        match config.provider {
            DistributedProvider::None => Ok(None),
            DistributedProvider::Moka => Ok(Some(Arc::new(MokaCacheProvider::with_capacity(
                config.moka_max_capacity,
            )))),
            DistributedProvider::Redis => {
                let url = Self::require_redis_url(config.redis_url.as_deref())?;
                Ok(Some(Arc::new(RedisCacheProvider::new(url)?)))
            }
        }
    }

    /// Create the connector for DEDICATED tenants, `None` when the tier is off
    pub fn create_connector(
        config: &DistributedCacheConfig,
    ) -> Result<Option<Arc<dyn DistributedCacheConnector>>> {
        match config.provider {
            DistributedProvider::None => Ok(None),
            DistributedProvider::Moka => Ok(Some(Arc::new(MokaCacheConnector::new(
                config.moka_max_capacity,
            )))),
            DistributedProvider::Redis => {
                let url = Self::require_redis_url(
                    config
                        .dedicated_redis_url
                        .as_deref()
                        .or(config.redis_url.as_deref()),
                )?;
                Ok(Some(Arc::new(RedisCacheConnector::new(url))))
            }
        }
    }

    fn require_redis_url(url: Option<&str>) -> Result<&str> {
        url.filter(|url| !url.is_empty()).ok_or_else(|| {
            Error::configuration("Redis URL is required when the distributed provider is redis")
        })
    }
}

/// Build a cache engine with its distributed tier attached
pub fn build_cache_engine(config: &CacheConfig) -> Result<CacheEngine> {
    let mut engine = CacheEngine::new(config);
    if !config.enabled {
        info!("Cache disabled");
        return Ok(engine);
    }

    if let Some(provider) = CacheProviderFactory::create(&config.distributed)? {
        info!(
            provider = provider.provider_name(),
            namespace = %config.namespace,
            "Distributed cache tier configured"
        );
        engine = engine.with_distributed(provider);
    } else {
        info!(namespace = %config.namespace, "Cache running local-only");
    }
    if let Some(connector) = CacheProviderFactory::create_connector(&config.distributed)? {
        engine = engine.with_connector(connector);
    }
    Ok(engine)
}
