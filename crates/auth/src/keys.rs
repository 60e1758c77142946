//! Session-store key namespace.
//!
//! The key formats are an interop contract with the deployed store contents
//! and must not change:
//!
//! | Key pattern            | Value                    | TTL    |
//! |------------------------|--------------------------|--------|
//! | `oauth_state:<state>`  | literal `pending`        | 10 min |
//! | `oauth:token:<userID>` | JSON-encoded TokenRecord | 24 h   |
//! | `token:<bearerToken>`  | user identifier string   | 24 h   |

use std::time::Duration;

/// Value stored under a state key while the callback is outstanding.
pub const STATE_PENDING: &str = "pending";

/// Lifetime of an unconsumed CSRF state entry.
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// Lifetime of a stored token record; reset on every write.
pub const TOKEN_TTL: Duration = Duration::from_secs(86_400);

/// Lifetime of a bearer session entry.
pub const SESSION_TTL: Duration = Duration::from_secs(86_400);

/// Key for a pending CSRF state token.
#[must_use]
pub fn state_key(state: &str) -> String {
    format!("oauth_state:{state}")
}

/// Key for a user's stored token record.
#[must_use]
pub fn token_key(user_id: &str) -> String {
    format!("oauth:token:{user_id}")
}

/// Key for a bearer session.
#[must_use]
pub fn session_key(token: &str) -> String {
    format!("token:{token}")
}
