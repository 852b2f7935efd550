//! Revoked signed tokens.
//!
//! Entries are keyed by the token's signature segment and kept only until
//! the token would have expired anyway.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::clock::Clock;
use crate::infra::Cache;
use common::AppResult;
use domain::SESSION_TTL_SECONDS;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// No signed token outlives this, so neither does its entry.
const MAX_ENTRY_TTL_SECONDS: i64 = SESSION_TTL_SECONDS;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenDenylist: Send + Sync {
    /// Remember `key` for `ttl_seconds`
    async fn insert(&self, key: &str, ttl_seconds: u64) -> AppResult<()>;

    async fn contains(&self, key: &str) -> AppResult<bool>;
}

/// Denylist shared by every auth-service replica.
pub struct RedisDenylist {
    cache: Cache,
}

impl RedisDenylist {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    fn key(key: &str) -> String {
        format!("revoked:{}", key)
    }
}

#[async_trait]
impl TokenDenylist for RedisDenylist {
    async fn insert(&self, key: &str, ttl_seconds: u64) -> AppResult<()> {
        self.cache.set_marker(&Self::key(key), ttl_seconds).await
    }

    async fn contains(&self, key: &str) -> AppResult<bool> {
        self.cache.exists(&Self::key(key)).await
    }
}

/// Process-local denylist for single-instance deployments and tests.
pub struct MemoryDenylist {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryDenylist {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl TokenDenylist for MemoryDenylist {
    async fn insert(&self, key: &str, ttl_seconds: u64) -> AppResult<()> {
        let now = self.clock.now();
        let ttl = i64::try_from(ttl_seconds)
            .unwrap_or(i64::MAX)
            .min(MAX_ENTRY_TTL_SECONDS);
        let until = now + Duration::seconds(ttl);

        let mut entries = self.entries.lock().await;
        entries.retain(|_, expires| *expires > now);
        entries.insert(key.to_string(), until);
        Ok(())
    }

    async fn contains(&self, key: &str) -> AppResult<bool> {
        let now = self.clock.now();
        let entries = self.entries.lock().await;
        Ok(entries.get(key).is_some_and(|expires| *expires > now))
    }
}
