//! Protected calendar-events handler and the bearer-validation middleware.

use axum::{
    Extension, Json,
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use calgate_types::{Event, GateError};
use serde::Deserialize;
use std::sync::Arc;

use crate::{AppState, error::ApiError};

/// User identity established by [`require_bearer`].
#[derive(Debug, Clone)]
pub struct UserId(pub String);

/// Middleware: validates the `Authorization: Bearer` header against the
/// session store and injects the resolved [`UserId`].
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError(GateError::Unauthorized))?;

    let user_id = state.auth.validate_bearer(token).await?;
    req.extensions_mut().insert(UserId(user_id));
    Ok(next.run(req).await)
}

#[derive(Debug, Deserialize)]
pub struct EventsParams {
    /// Result cap; non-numeric values fall back to the default.
    #[serde(default)]
    max: Option<String>,
}

/// `GET /calendar/events?max=` — list the caller's upcoming events.
pub async fn upcoming_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
    Query(params): Query<EventsParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let max = params.max.as_deref().and_then(|m| m.parse::<usize>().ok());
    let events = state.calendar.list_upcoming_events(&user.0, max).await?;
    Ok(Json(events))
}
