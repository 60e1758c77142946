//! API error type that maps [`GateError`] variants to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calgate_types::GateError;
use serde_json::json;

/// Wrapper around [`GateError`] that implements [`IntoResponse`].
pub struct ApiError(pub GateError);

impl ApiError {
    /// Returns the HTTP status for the wrapped error.
    fn status(&self) -> StatusCode {
        match &self.0 {
            GateError::InvalidState => StatusCode::BAD_REQUEST,
            GateError::Unauthorized
            | GateError::TokenNotFound(_)
            | GateError::TokenRefresh(_)
            | GateError::CalendarAccess {
                needs_reauth: true, ..
            } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl From<GateError> for ApiError {
    fn from(e: GateError) -> Self {
        Self(e)
    }
}
