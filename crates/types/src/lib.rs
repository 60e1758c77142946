//! Core types and traits for the calgate workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! calendar gateway, including the error taxonomy, the stored token record
//! and its codec, the wire-level event representation, and the async traits
//! that each layer implements.

pub mod error;
pub mod event;
pub mod token;
pub mod traits;

pub use error::GateError;
pub use event::Event;
pub use token::TokenRecord;
pub use traits::{EventsApi, EventsQuery, SessionStore, TokenExchanger};
