//! The service's own calendar event representation.

use serde::{Deserialize, Serialize};

/// A single upcoming calendar event as returned to the frontend.
///
/// `start` and `end` carry the upstream timestamp verbatim: an RFC 3339
/// instant for timed events, or a `YYYY-MM-DD` date for all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
