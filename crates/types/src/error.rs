//! Unified error type for the calgate workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across calgate crates.
///
/// Handlers never see raw transport or store errors; every failure is
/// recovered into one of these kinds at the component boundary.
#[derive(Debug, Error)]
pub enum GateError {
    /// The CSRF state token is absent, expired, or already consumed.
    #[error("invalid or expired state token")]
    InvalidState,

    /// The authorization-code exchange failed (transport or provider-side).
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// No stored token exists for the given user.
    #[error("no stored token for user: {0}")]
    TokenNotFound(String),

    /// The stored token is expired and could not be refreshed.
    /// Callers must treat this as "re-authorization required".
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// The bearer token does not map to any session.
    #[error("unauthorized")]
    Unauthorized,

    /// Calendar access was denied while acquiring a token.
    #[error("calendar access denied: {reason}")]
    CalendarAccess { reason: String, needs_reauth: bool },

    /// A single session-store operation failed; likely transient.
    #[error("session store error: {0}")]
    Store(String),

    /// The session store stayed unreachable across all retry attempts.
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored token record failed to decode; indicates data corruption.
    #[error("malformed token record: {0}")]
    MalformedToken(String),

    /// The upstream calendar API returned an error or was unreachable.
    #[error("upstream calendar error: {0}")]
    UpstreamCalendar(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GateError {
    /// Returns `true` if the error is transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_state() {
        let err = GateError::InvalidState;
        assert_eq!(err.to_string(), "invalid or expired state token");
    }

    #[test]
    fn test_error_display_token_not_found() {
        let err = GateError::TokenNotFound("user-42".to_string());
        assert!(err.to_string().contains("user-42"));
    }

    #[test]
    fn test_error_display_calendar_access() {
        let err = GateError::CalendarAccess {
            reason: "no stored token".to_string(),
            needs_reauth: true,
        };
        assert!(err.to_string().contains("no stored token"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid {{{").unwrap_err();
        let err: GateError = json_err.into();
        assert!(matches!(err, GateError::Serialization(_)));
    }

    #[test]
    fn test_is_retryable_store() {
        assert!(GateError::Store("connection reset".into()).is_retryable());
    }

    #[test]
    fn test_is_retryable_other_errors() {
        assert!(!GateError::InvalidState.is_retryable());
        assert!(!GateError::Unauthorized.is_retryable());
        assert!(!GateError::StoreUnavailable("down".into()).is_retryable());
        assert!(!GateError::TokenExchange("rejected".into()).is_retryable());
        assert!(!GateError::UpstreamCalendar("503".into()).is_retryable());
    }
}
