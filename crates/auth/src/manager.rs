//! Manager for the OAuth authorization flow and token lifecycle.
//!
//! Responsibilities:
//! - Generate CSRF state and build the authorization URL.
//! - Exchange callback codes for tokens and persist them.
//! - Detect expiration and trigger a single refresh attempt.
//! - Validate bearer sessions.
//!
//! The manager exclusively owns reads and writes of the state, token, and
//! session keys; handlers never touch the store directly. Every store
//! operation runs under the shared [`RetryPolicy`].

use calgate_store::RetryPolicy;
use calgate_types::{GateError, SessionStore, TokenExchanger, TokenRecord, error::Result};
use std::sync::Arc;

use crate::google::{self, OAuthConfig};
use crate::{keys, state};

pub struct OAuthManager {
    store: Arc<dyn SessionStore>,
    exchanger: Arc<dyn TokenExchanger>,
    oauth: OAuthConfig,
    retry: RetryPolicy,
}

impl OAuthManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        exchanger: Arc<dyn TokenExchanger>,
        oauth: OAuthConfig,
    ) -> Self {
        Self {
            store,
            exchanger,
            oauth,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the store retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Start an authorization flow: issue a pending CSRF state and return
    /// the provider authorization URL carrying it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::StoreUnavailable`] if the state cannot be
    /// persisted.
    pub async fn begin_auth(&self) -> Result<String> {
        let csrf = state::random_state();
        let key = keys::state_key(&csrf);
        self.retry
            .run(|| self.store.set(&key, keys::STATE_PENDING, keys::STATE_TTL))
            .await?;
        tracing::debug!("issued oauth state");
        Ok(google::build_auth_url(&self.oauth, &csrf))
    }

    /// Complete the authorization flow: validate and consume the state,
    /// exchange the code, and persist the token under a newly minted user
    /// identifier, which is returned.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidState`] for an unknown, expired, or
    /// already-consumed state and [`GateError::TokenExchange`] if the code
    /// exchange is rejected.
    pub async fn complete_auth(&self, code: &str, csrf: &str) -> Result<String> {
        let key = keys::state_key(csrf);
        let current = self.retry.run(|| self.store.get(&key)).await?;
        if current.as_deref() != Some(keys::STATE_PENDING) {
            return Err(GateError::InvalidState);
        }
        // State is single-use: consume it before the exchange.
        self.retry.run(|| self.store.delete(&key)).await?;

        let record = self.exchanger.exchange_code(code).await?;

        let user_id = uuid::Uuid::new_v4().to_string();
        let token_key = keys::token_key(&user_id);
        let encoded = record.encode()?;
        self.retry
            .run(|| self.store.set(&token_key, &encoded, keys::TOKEN_TTL))
            .await?;
        tracing::info!(user_id = %user_id, "completed authorization code exchange");
        Ok(user_id)
    }

    /// Return a live token for the user, refreshing it in place when the
    /// stored record has expired.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::TokenNotFound`] if no record exists (never
    /// authorized, or the store entry expired), [`GateError::MalformedToken`]
    /// if the stored value does not decode, and [`GateError::TokenRefresh`]
    /// if the single refresh attempt fails.
    pub async fn get_valid_token(&self, user_id: &str) -> Result<TokenRecord> {
        let key = keys::token_key(user_id);
        let raw = self
            .retry
            .run(|| self.store.get(&key))
            .await?
            .ok_or_else(|| GateError::TokenNotFound(user_id.to_string()))?;
        let record = TokenRecord::decode(&raw)?;
        if !record.is_expired() {
            return Ok(record);
        }

        let refresh_token = record
            .refresh_token
            .ok_or_else(|| GateError::TokenRefresh("no refresh token stored".into()))?;
        let mut renewed = self.exchanger.refresh(&refresh_token).await?;
        // Google omits the refresh token from refresh responses; keep ours.
        if renewed.refresh_token.is_none() {
            renewed.refresh_token = Some(refresh_token);
        }
        let encoded = renewed.encode()?;
        self.retry
            .run(|| self.store.set(&key, &encoded, keys::TOKEN_TTL))
            .await?;
        tracing::debug!(user_id = %user_id, "refreshed expired access token");
        Ok(renewed)
    }

    /// Resolve a bearer token to its user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Unauthorized`] if the token maps to no session.
    pub async fn validate_bearer(&self, token: &str) -> Result<String> {
        let key = keys::session_key(token);
        self.retry
            .run(|| self.store.get(&key))
            .await?
            .ok_or(GateError::Unauthorized)
    }

    /// Issue a bearer session for an existing user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::StoreUnavailable`] if the session cannot be
    /// persisted.
    pub async fn create_session(&self, user_id: &str) -> Result<String> {
        let token = state::random_session_token();
        let key = keys::session_key(&token);
        self.retry
            .run(|| self.store.set(&key, user_id, keys::SESSION_TTL))
            .await?;
        Ok(token)
    }
}
