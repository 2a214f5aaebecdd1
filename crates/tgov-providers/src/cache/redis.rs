//! Redis distributed cache provider
//!
//! Distributed tier backed by Redis. Suitable for multi-instance deployments.
//!
//! ## Features
//!
//! - Millisecond TTLs via `PSETEX`
//! - Prefix deletion via incremental `SCAN` + batched `DEL`
//! - One multiplexed connection per provider, opened lazily and reused
//!
//! ## Example
//!
//! ```ignore
//! use tgov_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?;
//! // Or with host/port
//! let provider = RedisCacheProvider::with_host_port("localhost", 6379)?;
//! ```

use crate::constants::{MAX_ENTRY_TTL, REDIS_SCAN_BATCH_SIZE};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tgov_domain::error::{Error, Result};
use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};
use tgov_domain::value_objects::TenantId;
use tokio::sync::Mutex;

/// Redis cache provider
///
/// Uses a single multiplexed connection, opened on first use and reopened
/// after a failed command. Once closed the provider rejects every call.
pub struct RedisCacheProvider {
    client: Client,
    server: String,
    connection: Mutex<Option<MultiplexedConnection>>,
    closed: AtomicBool,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider with connection string
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379")
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::infrastructure_with_source(format!("Failed to create Redis client: {}", e), e)
        })?;

        Ok(Self {
            client,
            server: server_of(connection_string),
            connection: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Create a new Redis cache provider with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{}:{}", host, port))
    }

    /// Get the shared connection, opening it on first use
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::infrastructure("Redis provider is closed"));
        }

        let mut guard = self.connection.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                Error::infrastructure_with_source(
                    format!("Failed to get Redis connection: {}", e),
                    e,
                )
            })?;
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the cached connection so the next call reconnects
    async fn reset_connection(&self) {
        *self.connection.lock().await = None;
    }

    /// Map a command failure; the connection is reopened on the next call
    async fn command_error(&self, command: &str, e: redis::RedisError) -> Error {
        self.reset_connection().await;
        Error::infrastructure_with_source(format!("Redis {} failed: {}", command, e), e)
    }

    /// Redis server address description
    pub fn server_address(&self) -> &str {
        &self.server
    }
}

/// Strip scheme and credentials from a connection URL
fn server_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .rsplit_once('@')
        .map_or(without_scheme, |(_, host)| host)
        .to_string()
}

/// Escape glob metacharacters so `prefix` matches literally in `SCAN MATCH`
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl DistributedCacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;

        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.command_error("GET", e).await),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let ttl_millis = ttl
            .and_then(|ttl| u64::try_from(ttl.min(MAX_ENTRY_TTL).as_millis()).ok())
            .unwrap_or(0);
        let result: redis::RedisResult<()> = if ttl_millis > 0 {
            conn.pset_ex(key, value, ttl_millis).await
        } else {
            conn.set(key, value).await
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.command_error("SET", e).await),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let deleted: redis::RedisResult<u64> = conn.del(key).await;
        match deleted {
            Ok(count) => Ok(count > 0),
            Err(e) => Err(self.command_error("DEL", e).await),
        }
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64> {
        let mut conn = self.get_connection().await?;
        let pattern = format!("{}*", escape_glob(prefix));

        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => return Err(self.command_error("SCAN", e).await),
            };

            if !keys.is_empty() {
                let deleted: redis::RedisResult<u64> = conn.del(keys.as_slice()).await;
                match deleted {
                    Ok(count) => removed += count,
                    Err(e) => return Err(self.command_error("DEL", e).await),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        match pong {
            Ok(_) => Ok(()),
            Err(e) => Err(self.command_error("PING", e).await),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.reset_connection().await;
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("server", &self.server_address())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Opens a private Redis connection per dedicated tenant
#[derive(Debug, Clone)]
pub struct RedisCacheConnector {
    url: String,
}

impl RedisCacheConnector {
    /// Create a connector targeting `url`
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl DistributedCacheConnector for RedisCacheConnector {
    async fn connect_dedicated(
        &self,
        tenant: &TenantId,
    ) -> Result<Arc<dyn DistributedCacheProvider>> {
        let provider = RedisCacheProvider::new(&self.url)?;
        provider.ping().await?;
        tracing::info!(
            tenant = %tenant,
            server = %provider.server_address(),
            "Dedicated Redis connection opened"
        );
        Ok(Arc::new(provider))
    }
}
