//! Redis-backed session store.
//!
//! Uses a multiplexed connection manager created once at startup; every
//! operation clones the manager handle, so the store is cheap to share
//! across request tasks. TTLs map directly onto Redis key expiry.

use ::redis::AsyncCommands as _;
use ::redis::aio::ConnectionManager;
use async_trait::async_trait;
use calgate_types::{GateError, SessionStore, error::Result};
use std::time::Duration;

/// A [`SessionStore`] backed by Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connects to Redis (e.g. `"redis://localhost:6379"`).
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] for an unparseable URL and
    /// [`GateError::Store`] if the initial connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = ::redis::Client::open(url)
            .map_err(|e| GateError::Config(format!("invalid store url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| GateError::Store(e.to_string()))?;
        tracing::info!(url, "connected to session store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(|e| GateError::Store(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let () = conn
            .del(key)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?;
        Ok(())
    }
}
