//! Stored OAuth token record, expiry logic, and the store-value codec.

use crate::GateError;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// An OAuth token record as persisted in the session store.
///
/// The owning user is carried by the store key, not the record; the codec's
/// field set is exactly `access_token`, optional `refresh_token`, and
/// `expires_at` (unix seconds, in the upstream issuer's clock domain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: u64,
}

impl TokenRecord {
    /// Create a new record. The expiry starts at the epoch (already
    /// expired); set a real deadline with [`TokenRecord::with_expiry`].
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: 0,
        }
    }

    /// Set the expiry to `expires_in_secs` seconds from now.
    #[must_use]
    pub fn with_expiry(mut self, expires_in_secs: u64) -> Self {
        self.expires_at = unix_now() + expires_in_secs;
        self
    }

    /// Attach a refresh token.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// A record is live iff its expiry is strictly after the current time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        unix_now() >= self.expires_at
    }

    /// Serialize the record to its store value format.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Serialization`] if JSON encoding fails.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a record from its store value format.
    ///
    /// Unknown or missing required fields fail rather than silently
    /// defaulting; only the refresh token is optional (absent means the
    /// record cannot be refreshed).
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MalformedToken`] if the value does not decode.
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| GateError::MalformedToken(e.to_string()))
    }
}

/// Current unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
