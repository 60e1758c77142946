//! Google Calendar client and the calendar-read adapter.
//!
//! [`client`] is the low-level HTTP client for the upstream events API;
//! [`service`] gates it behind token acquisition from the OAuth manager.

pub mod client;
pub mod service;

pub use client::GoogleCalendarClient;
pub use service::{CalendarService, DEFAULT_MAX_RESULTS};
