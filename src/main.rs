use std::sync::Arc;

use announce_service::{
    api::{AppState, serve_then_drain},
    config::Config,
};
use anyhow::{Error, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = Config::load()?;
    let port = config.server_port;

    let state = Arc::new(AppState::new(config)?);
    let worker = state.dispatcher.start().await;
    info!(%worker, "Announce service ready");
    debug!("{}", state.status_report());

    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(Arc::clone(&state)));

    serve_then_drain(Arc::clone(&state), port, shutdown_signal()).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
    }
}

#[cfg(unix)]
async fn reload_on_hangup(state: Arc<AppState>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            error!(error = %e, "Failed to install SIGHUP handler, reload disabled");
            return;
        }
    };

    while hangup.recv().await.is_some() {
        info!("Received SIGHUP, reloading announce configuration");

        match Config::load() {
            Ok(config) => {
                let worker = state.apply_config(config).await;
                info!(%worker, "Announce configuration reloaded");
            }
            Err(e) => error!(error = %format!("{e:#}"), "Reload failed, keeping current configuration"),
        }
    }
}
