use calgate_types::GateError;
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_redirect_uri() -> String {
    "http://localhost:8080/calendar/auth/callback".to_string()
}
fn default_scopes() -> Vec<String> {
    vec!["https://www.googleapis.com/auth/calendar.readonly".to_string()]
}

/// Google OAuth client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI registered with the provider.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// OAuth scopes requested during authorization.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
        }
    }
}

/// The client-secret JSON blob Google's console exports, with credentials
/// nested under either a `web` or an `installed` key.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    web: Option<CredentialEntry>,
    installed: Option<CredentialEntry>,
}

#[derive(Debug, Deserialize)]
struct CredentialEntry {
    client_id: String,
    client_secret: String,
}

impl GoogleConfig {
    /// Overrides the client id/secret from a Google client-secret JSON blob.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the blob does not parse or carries
    /// neither a `web` nor an `installed` entry.
    pub fn apply_credentials_json(&mut self, blob: &str) -> Result<(), GateError> {
        let file: CredentialsFile = serde_json::from_str(blob)
            .map_err(|e| GateError::Config(format!("unable to parse client secret: {e}")))?;
        let entry = file.web.or(file.installed).ok_or_else(|| {
            GateError::Config("client secret has no web or installed entry".to_string())
        })?;
        self.client_id = entry.client_id;
        self.client_secret = entry.client_secret;
        Ok(())
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen address (defaults to `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (defaults to 8080).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Session store connection URL.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Base URL the callback redirects to on success.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Google OAuth client settings.
    #[serde(default)]
    pub google: GoogleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redis_url: default_redis_url(),
            frontend_url: default_frontend_url(),
            google: GoogleConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from defaults, an optional YAML file, and
    /// `CALGATE_`-prefixed environment variables (nested keys split on
    /// `__`, e.g. `CALGATE_GOOGLE__CLIENT_ID`).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if any source fails to parse or extract.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("CALGATE_").split("__")).extract()
    }
}
