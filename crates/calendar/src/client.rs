//! Google Calendar API client.
//!
//! Lists events from the user's primary calendar with recurring events
//! expanded to single occurrences and results ordered by start time.
//! Failures are never retried here; retry policy belongs to the caller.

use async_trait::async_trait;
use calgate_types::{Event, EventsApi, EventsQuery, GateError, error::Result};
use serde::Deserialize;
use std::time::Duration;

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// HTTP client for the upstream events API.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a client with the given outbound-call timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EventsApi for GoogleCalendarClient {
    async fn list_events(&self, access_token: &str, query: &EventsQuery) -> Result<Vec<Event>> {
        let url = format!("{}/calendars/primary/events", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", query.time_min.to_rfc3339()),
                ("maxResults", query.max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("showDeleted", "false".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| GateError::UpstreamCalendar(format!("events request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GateError::UpstreamCalendar(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(GateError::UpstreamCalendar(format!(
                "events endpoint returned {status}: {body}"
            )));
        }

        let list: EventListResponse = serde_json::from_str(&body)
            .map_err(|e| GateError::UpstreamCalendar(format!("invalid events response: {e}")))?;

        let events: Vec<Event> = list.items.into_iter().filter_map(convert_event).collect();
        tracing::debug!(count = events.len(), "fetched upcoming events");
        Ok(events)
    }
}

/// Maps an upstream item to the service's event shape, preferring a timed
/// start/end over an all-day date. Cancelled or timeless items are dropped.
fn convert_event(event: ApiEvent) -> Option<Event> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }
    let id = event.id?;
    let start_time = event.start.unwrap_or_default();
    let end_time = event.end.unwrap_or_default();
    let start = start_time.date_time.or(start_time.date)?;
    let end = end_time.date_time.or(end_time.date)?;
    Some(Event {
        id,
        summary: event.summary.unwrap_or_default(),
        start,
        end,
        location: event.location,
    })
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    location: Option<String>,
    status: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
}

/// Event time from the API: either a timed instant or an all-day date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}
