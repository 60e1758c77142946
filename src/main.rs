use anyhow::Result;
use calgate_auth::{GoogleTokenClient, OAuthConfig, OAuthManager};
use calgate_calendar::{CalendarService, GoogleCalendarClient};
use calgate_config::Config;
use calgate_server::AppState;
use calgate_store::RedisSessionStore;
use calgate_types::SessionStore;
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Timeout applied to every outbound provider call (token endpoint and
/// events listing), so a client disconnect does not leak the call.
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "calgate", about = "calgate — Google Calendar OAuth gateway")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the listening port (default: 8080).
    #[arg(short, long)]
    port: Option<u16>,
    /// Override the listening address (default: 0.0.0.0).
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    if let Some(p) = cli.port {
        config.port = p;
    }
    if let Some(h) = cli.host {
        config.host = h;
    }
    if let Ok(blob) = std::env::var("GOOGLE_CREDENTIALS_JSON") {
        config
            .google
            .apply_credentials_json(&blob)
            .map_err(|e| anyhow::anyhow!("credentials error: {e}"))?;
    }

    let store: Arc<dyn SessionStore> = Arc::new(
        RedisSessionStore::connect(&config.redis_url)
            .await
            .map_err(|e| anyhow::anyhow!("store error: {e}"))?,
    );

    let oauth = OAuthConfig::from(&config.google);
    let exchanger = Arc::new(GoogleTokenClient::new(oauth.clone(), OUTBOUND_TIMEOUT));
    let auth = Arc::new(OAuthManager::new(store, exchanger, oauth));
    let events_api = Arc::new(GoogleCalendarClient::new(OUTBOUND_TIMEOUT));
    let calendar = Arc::new(CalendarService::new(Arc::clone(&auth), events_api));

    let state = AppState::new(auth, calendar, config.frontend_url.clone());
    let app = calgate_server::make_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "calgate listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shut down cleanly");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("calgate=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
