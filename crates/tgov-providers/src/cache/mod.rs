//! Distributed Cache Provider Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullCacheProvider`] | Testing | No-op stub |
//! | [`MokaCacheProvider`] | In-process | Moka-backed stand-in with per-entry TTL |
//! | [`RedisCacheProvider`] | Distributed | Redis-backed for multi-instance |
//!
//! Each backend also has a connector that opens private instances for
//! dedicated tenants.

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-moka")]
pub use moka::{MokaCacheConnector, MokaCacheProvider};
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::{RedisCacheConnector, RedisCacheProvider};
