//! HTTP layer — axum router, route handlers, and error mapping.
//!
//! Exposes the OAuth flow endpoints and the protected calendar-events
//! endpoint consumed by the web frontend.

mod auth;
mod error;
mod events;

pub use error::ApiError;
pub use events::UserId;

use axum::{Json, Router, middleware, routing::get};
use calgate_auth::OAuthManager;
use calgate_calendar::CalendarService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// OAuth flow and token lifecycle manager.
    pub auth: Arc<OAuthManager>,
    /// Calendar-read adapter.
    pub calendar: Arc<CalendarService>,
    /// Base URL the callback redirects to on success.
    pub frontend_url: String,
}

impl AppState {
    /// Creates a new shared application state wrapped in an `Arc`.
    pub fn new(
        auth: Arc<OAuthManager>,
        calendar: Arc<CalendarService>,
        frontend_url: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            auth,
            calendar,
            frontend_url: frontend_url.into(),
        })
    }
}

/// Build the full axum router.
///
/// Routes:
/// - GET /calendar/auth              start the OAuth flow, returns the auth URL
/// - GET /calendar/auth/callback     provider redirect target
/// - GET /calendar/events            upcoming events (bearer-protected)
/// - GET /health                     liveness check
pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calendar/auth", get(auth::google_auth))
        .route("/calendar/auth/callback", get(auth::google_callback))
        .route(
            "/calendar/events",
            get(events::upcoming_events).layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                events::require_bearer,
            )),
        )
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use calgate_auth::{OAuthConfig, keys};
    use calgate_store::InMemorySessionStore;
    use calgate_types::{
        Event, EventsApi, EventsQuery, GateError, SessionStore, TokenExchanger, TokenRecord,
        error::Result,
    };
    use http_body_util::BodyExt as _;
    use serde_json::Value;
    use tower::ServiceExt as _;

    struct MockExchanger {
        fail_exchange: bool,
    }

    #[async_trait]
    impl TokenExchanger for MockExchanger {
        async fn exchange_code(&self, _code: &str) -> Result<TokenRecord> {
            if self.fail_exchange {
                return Err(GateError::TokenExchange("code rejected".into()));
            }
            Ok(TokenRecord::new("granted")
                .with_expiry(3600)
                .with_refresh("refresh-1"))
        }
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenRecord> {
            Ok(TokenRecord::new("renewed").with_expiry(3600))
        }
    }

    struct MockEventsApi;

    #[async_trait]
    impl EventsApi for MockEventsApi {
        async fn list_events(&self, _token: &str, _query: &EventsQuery) -> Result<Vec<Event>> {
            Ok((0..12)
                .map(|i| Event {
                    id: format!("e{i}"),
                    summary: format!("event {i}"),
                    start: format!("2027-01-{:02}T10:00:00Z", i + 1),
                    end: format!("2027-01-{:02}T11:00:00Z", i + 1),
                    location: None,
                })
                .collect())
        }
    }

    fn make_state(frontend_url: &str, fail_exchange: bool) -> (Arc<AppState>, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let auth = Arc::new(OAuthManager::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::new(MockExchanger { fail_exchange }),
            OAuthConfig {
                client_id: "test-id".into(),
                client_secret: "test-secret".into(),
                redirect_uri: "http://localhost:8080/calendar/auth/callback".into(),
                scopes: vec!["https://www.googleapis.com/auth/calendar.readonly".into()],
            },
        ));
        let calendar = Arc::new(CalendarService::new(
            Arc::clone(&auth),
            Arc::new(MockEventsApi),
        ));
        (AppState::new(auth, calendar, frontend_url), store)
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_bearer(app: &Router, uri: &str, bearer: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("authorization", format!("Bearer {bearer}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn extract_state_param(auth_url: &str) -> String {
        auth_url
            .split('&')
            .find_map(|p| p.strip_prefix("state="))
            .expect("auth url carries a state parameter")
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get(&app, "/health").await;
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_auth_returns_url() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get(&app, "/calendar/auth").await;
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let json = body_json(resp).await;
        let url = json["auth_url"].as_str().unwrap();
        assert!(url.starts_with("https://accounts.google.com/"));
        assert!(url.contains("state="));
        assert!(url.contains("access_type=offline"));
    }

    #[tokio::test]
    async fn test_callback_missing_params_is_400() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get(&app, "/calendar/auth/callback").await;
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_callback_unknown_state_is_400() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get(&app, "/calendar/auth/callback?code=ok&state=forged").await;
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_callback_redirects_to_frontend() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);

        let resp = get(&app, "/calendar/auth").await;
        let json = body_json(resp).await;
        let csrf = extract_state_param(json["auth_url"].as_str().unwrap());

        let resp = get(&app, &format!("/calendar/auth/callback?code=ok&state={csrf}")).await;
        assert_eq!(resp.status(), axum::http::StatusCode::FOUND);
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(location.starts_with("http://localhost:3000/calendar/auth?user_id="));
        assert!(location.ends_with("&status=success"));
    }

    #[tokio::test]
    async fn test_callback_does_not_duplicate_trailing_slash() {
        let (state, _) = make_state("http://localhost:3000/", false);
        let app = make_router(state);

        let resp = get(&app, "/calendar/auth").await;
        let json = body_json(resp).await;
        let csrf = extract_state_param(json["auth_url"].as_str().unwrap());

        let resp = get(&app, &format!("/calendar/auth/callback?code=ok&state={csrf}")).await;
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(location.starts_with("http://localhost:3000/calendar/auth?"));
        assert!(!location.contains("//calendar"));
    }

    #[tokio::test]
    async fn test_callback_exchange_failure_is_500() {
        let (state, _) = make_state("http://localhost:3000", true);
        let app = make_router(state);

        let resp = get(&app, "/calendar/auth").await;
        let json = body_json(resp).await;
        let csrf = extract_state_param(json["auth_url"].as_str().unwrap());

        let resp = get(&app, &format!("/calendar/auth/callback?code=bad&state={csrf}")).await;
        assert_eq!(
            resp.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("code rejected"));
    }

    #[tokio::test]
    async fn test_events_without_bearer_is_401() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get(&app, "/calendar/events").await;
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_events_unknown_bearer_is_401() {
        let (state, _) = make_state("http://localhost:3000", false);
        let app = make_router(state);
        let resp = get_bearer(&app, "/calendar/events", "unknown-token").await;
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "unauthorized");
    }

    async fn seed_session(state: &Arc<AppState>, store: &InMemorySessionStore) -> String {
        let record = TokenRecord::new("live").with_expiry(3600);
        store
            .set(
                &keys::token_key("u-1"),
                &record.encode().unwrap(),
                keys::TOKEN_TTL,
            )
            .await
            .unwrap();
        state.auth.create_session("u-1").await.unwrap()
    }

    #[tokio::test]
    async fn test_events_with_session() {
        let (state, store) = make_state("http://localhost:3000", false);
        let bearer = seed_session(&state, &store).await;
        let app = make_router(state);

        let resp = get_bearer(&app, "/calendar/events?max=3", &bearer).await;
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let json = body_json(resp).await;
        let events = json.as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["id"], "e0");
    }

    #[tokio::test]
    async fn test_events_max_defaults_to_ten() {
        let (state, store) = make_state("http://localhost:3000", false);
        let bearer = seed_session(&state, &store).await;
        let app = make_router(state);

        let resp = get_bearer(&app, "/calendar/events", &bearer).await;
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_events_non_numeric_max_defaults() {
        let (state, store) = make_state("http://localhost:3000", false);
        let bearer = seed_session(&state, &store).await;
        let app = make_router(state);

        let resp = get_bearer(&app, "/calendar/events?max=lots", &bearer).await;
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 10);
    }
}
