//! Calendar-read adapter: token acquisition, then the upstream listing call.

use calgate_auth::OAuthManager;
use calgate_types::{Event, EventsApi, EventsQuery, GateError, error::Result};
use chrono::Utc;
use std::sync::Arc;

/// Result cap applied when the caller does not specify one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Lists upcoming events for an authorized user.
pub struct CalendarService {
    auth: Arc<OAuthManager>,
    api: Arc<dyn EventsApi>,
}

impl CalendarService {
    pub fn new(auth: Arc<OAuthManager>, api: Arc<dyn EventsApi>) -> Self {
        Self { auth, api }
    }

    /// Return at most `max_results` upcoming events (default 10), ordered by
    /// start time ascending with recurring events expanded upstream.
    ///
    /// # Errors
    ///
    /// Token acquisition failures surface as
    /// [`GateError::CalendarAccess`] with `needs_reauth` set; upstream
    /// failures as [`GateError::UpstreamCalendar`], never retried here.
    pub async fn list_upcoming_events(
        &self,
        user_id: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<Event>> {
        let max = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let token = self.auth.get_valid_token(user_id).await.map_err(|e| {
            if matches!(e, GateError::TokenNotFound(_) | GateError::TokenRefresh(_)) {
                GateError::CalendarAccess {
                    reason: e.to_string(),
                    needs_reauth: true,
                }
            } else {
                e
            }
        })?;

        let query = EventsQuery {
            time_min: Utc::now(),
            max_results: max,
        };
        let mut events = self.api.list_events(&token.access_token, &query).await?;
        events.truncate(max);
        Ok(events)
    }
}
