//! Redis connection used by the revoked-token denylist.

use redis::{aio::ConnectionManager, AsyncCommands, Client};

use common::AppResult;

/// Redis wrapper with a managed, auto-reconnecting connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    key_prefix: String,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> AppResult<Self> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    /// Store a marker value that Redis drops after `ttl_seconds`.
    pub async fn set_marker(&self, key: &str, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(self.key(key), 1u8, ttl_seconds).await?;
        Ok(())
    }

    /// Check if a key exists.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(self.key(key)).await?;
        Ok(exists)
    }
}
