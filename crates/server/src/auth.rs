//! OAuth flow handlers: auth-URL issuance and the provider callback.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use calgate_types::GateError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{AppState, error::ApiError};

/// `GET /calendar/auth` — start the OAuth flow.
pub async fn google_auth(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth_url = state.auth.begin_auth().await?;
    Ok(Json(json!({ "auth_url": auth_url })))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// `GET /calendar/auth/callback` — complete the OAuth flow and redirect the
/// browser back to the frontend with the new user identifier.
pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let (Some(code), Some(csrf)) = (params.code, params.state) else {
        return Err(ApiError(GateError::InvalidState));
    };
    let user_id = state.auth.complete_auth(&code, &csrf).await?;

    let base = state.frontend_url.trim_end_matches('/');
    let target = format!("{base}/calendar/auth?user_id={user_id}&status=success");
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
