//! Configuration loading for the calgate service.
//!
//! Uses figment with layered sources: built-in defaults, an optional YAML
//! file, then `CALGATE_`-prefixed environment variables. The Google
//! client-secret JSON blob (`GOOGLE_CREDENTIALS_JSON`) is applied on top.

pub mod schema;

pub use schema::{Config, GoogleConfig};
