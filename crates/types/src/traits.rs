//! Async traits shared across all calgate crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `calgate-types`, not on each other.

use crate::{Event, TokenRecord, error::Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A key-value session store with per-key expiry.
///
/// Backs both CSRF state tokens and OAuth token records. Implementations
/// must be safe for concurrent use; each `set` is a single atomic key write.
/// Transient failures surface as [`crate::GateError::Store`] so the retry
/// policy can distinguish them from definitive results.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a key. `Ok(None)` is a definitive "not found" (including expiry).
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a key with a time-to-live, overwriting any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Exchanges authorization codes and refresh tokens at the provider's token
/// endpoint.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange an authorization code for a token record.
    async fn exchange_code(&self, code: &str) -> Result<TokenRecord>;
    /// Obtain a fresh access token using the stored refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord>;
}

/// Parameters for an upstream event listing call.
#[derive(Debug, Clone)]
pub struct EventsQuery {
    /// Lower bound on event start time; events strictly in the future or
    /// ongoing at this instant.
    pub time_min: DateTime<Utc>,
    /// Result cap, forwarded upstream.
    pub max_results: usize,
}

/// The upstream "list events" capability, given a valid access token.
///
/// Implementations expand recurring events into single occurrences and
/// return results ordered by start time ascending.
#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn list_events(&self, access_token: &str, query: &EventsQuery) -> Result<Vec<Event>>;
}
