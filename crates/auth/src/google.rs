//! Google OAuth 2.0 endpoints: authorization-URL building, code exchange,
//! and token refresh.
//!
//! Offline access is always requested so the token endpoint issues a
//! refresh token alongside the access token.

use async_trait::async_trait;
use calgate_types::{GateError, TokenExchanger, TokenRecord, error::Result};
use std::time::Duration;

/// Google OAuth 2.0 authorization endpoint.
pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth 2.0 token endpoint.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Fallback access-token lifetime when the provider omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// OAuth client configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl From<&calgate_config::GoogleConfig> for OAuthConfig {
    fn from(cfg: &calgate_config::GoogleConfig) -> Self {
        Self {
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            redirect_uri: cfg.redirect_uri.clone(),
            scopes: cfg.scopes.clone(),
        }
    }
}

/// Build the authorization URL carrying the given anti-forgery state.
#[must_use]
pub fn build_auth_url(cfg: &OAuthConfig, state: &str) -> String {
    let scope = cfg.scopes.join(" ");
    format!(
        "{AUTH_URL}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}&access_type=offline&prompt=consent",
        urlencoding::encode(&cfg.client_id),
        urlencoding::encode(&cfg.redirect_uri),
        urlencoding::encode(&scope),
        urlencoding::encode(state),
    )
}

/// Parse the token endpoint JSON response into a [`TokenRecord`].
///
/// # Errors
///
/// Returns [`GateError::TokenExchange`] if `access_token` is missing.
pub fn parse_token_response(json: &serde_json::Value) -> Result<TokenRecord> {
    let access_token = json
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| GateError::TokenExchange("missing access_token in response".into()))?;

    let expires_in = json
        .get("expires_in")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(DEFAULT_EXPIRES_IN);

    let mut record = TokenRecord::new(access_token).with_expiry(expires_in);
    if let Some(r) = json
        .get("refresh_token")
        .and_then(serde_json::Value::as_str)
    {
        record = record.with_refresh(r);
    }
    Ok(record)
}

/// A [`TokenExchanger`] that talks to Google's token endpoint.
pub struct GoogleTokenClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl GoogleTokenClient {
    /// Creates a client with the given outbound-call timeout.
    #[must_use]
    pub fn new(config: OAuthConfig, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, http }
    }

    async fn post_token_form(&self, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(TOKEN_URL)
            .form(params)
            .send()
            .await
            .map_err(|e| GateError::TokenExchange(format!("token endpoint request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GateError::TokenExchange(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(GateError::TokenExchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| GateError::TokenExchange(format!("invalid token response: {e}")))
    }
}

#[async_trait]
impl TokenExchanger for GoogleTokenClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenRecord> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        let json = self.post_token_form(&params).await?;
        parse_token_response(&json)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        let result = async {
            let json = self.post_token_form(&params).await?;
            parse_token_response(&json)
        }
        .await;
        // Failures on this path are TokenRefresh: the re-authorization signal.
        result.map_err(|e| match e {
            GateError::TokenExchange(msg) => GateError::TokenRefresh(msg),
            other => other,
        })
    }
}
