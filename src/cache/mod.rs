//! Redis cache layer (refresh token revocation list)

use crate::config::RedisConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache key prefixes
mod keys {
    pub const TOKEN_BLACKLIST: &str = "bloodbank:token_blacklist";
}

fn blacklist_key(jti: &str) -> String {
    format!("{}:{}", keys::TOKEN_BLACKLIST, jti)
}

/// Operations the request handlers need from the cache
#[async_trait]
pub trait CacheOperations: Send + Sync {
    /// Revoke a token ID for `ttl_secs` seconds.
    ///
    /// Returns `false` if the token ID was already revoked.
    async fn add_to_token_blacklist(&self, jti: &str, ttl_secs: u64) -> Result<bool>;

    /// Whether a token ID has been revoked
    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool>;

    /// Health check
    async fn ping(&self) -> Result<()>;
}

/// Cache manager for Redis operations
#[derive(Clone)]
pub struct CacheManager {
    conn: ConnectionManager,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create Redis client: {}", e))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to connect to Redis: {}", e))
        })?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheOperations for CacheManager {
    async fn add_to_token_blacklist(&self, jti: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.conn.clone();
        // SET NX so two concurrent logouts with the same token cannot both succeed
        let reply: Option<String> = redis::cmd("SET")
            .arg(blacklist_key(jti))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs.max(1))
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(blacklist_key(jti))
            .query_async(&mut conn)
            .await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// In-process revocation list with expiry.
///
/// For tests and single-instance development runs without Redis.
#[derive(Clone, Default)]
pub struct MemoryCacheManager {
    entries: Arc<RwLock<HashMap<String, Instant>>>,
}

impl MemoryCacheManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheOperations for MemoryCacheManager {
    async fn add_to_token_blacklist(&self, jti: &str, ttl_secs: u64) -> Result<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, expires_at| *expires_at > now);

        let key = blacklist_key(jti);
        if entries.contains_key(&key) {
            return Ok(false);
        }
        entries.insert(key, now + Duration::from_secs(ttl_secs.max(1)));
        Ok(true)
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&blacklist_key(jti))
            .is_some_and(|expires_at| *expires_at > Instant::now()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
