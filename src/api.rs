use std::sync::{Arc, RwLock};

use anyhow::{Context, Error, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::{
    clients::{health::HealthChecker, webhook::WebhookClient},
    config::Config,
    dispatcher::Dispatcher,
    hooks,
    models::{
        event::GameEvent,
        status::{StatusReport, WorkerState},
    },
};

/// Process-wide settings and the dispatcher, owned by `main` and shared with
/// the HTTP handlers.
pub struct AppState {
    config: RwLock<Config>,
    reload: tokio::sync::Mutex<()>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = WebhookClient::new(&config)?;
        let dispatcher = Dispatcher::new(client, config.endpoint());

        Ok(Self {
            config: RwLock::new(config),
            reload: tokio::sync::Mutex::new(()),
            dispatcher,
        })
    }

    pub fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Swaps in freshly loaded settings and restarts the worker against the
    /// new endpoint. Concurrent reloads apply one after the other, so the
    /// settings and the dispatcher endpoint always come from the same load.
    pub async fn apply_config(&self, config: Config) -> WorkerState {
        let _reload = self.reload.lock().await;
        let endpoint = config.endpoint();

        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;

        self.dispatcher.reconfigure(endpoint).await
    }

    pub fn announce(&self, event: &GameEvent) -> Option<String> {
        let config = self.config();
        hooks::announce(&config, &self.dispatcher, event)
    }

    pub fn status_report(&self) -> StatusReport {
        let worker = self.dispatcher.state();
        StatusReport::new(&self.config(), worker, self.dispatcher.pending_len())
    }
}

#[derive(Debug, Serialize)]
pub struct EventAccepted {
    pub announced: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/announce/info", get(announce_info))
        .route("/events", post(ingest_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server<F>(state: Arc<AppState>, port: u16, shutdown: F) -> Result<(), Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(address = %addr, "Announce API server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Announce API server failed")?;

    Ok(())
}

/// Serves the API until `shutdown` fires, then drains the announcement queue.
/// The queue is drained even when the server fails, and the server error is
/// returned afterwards.
pub async fn serve_then_drain<F>(state: Arc<AppState>, port: u16, shutdown: F) -> Result<(), Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let served = run_api_server(Arc::clone(&state), port, shutdown).await;
    if let Err(e) = &served {
        error!(error = %format!("{e:#}"), "Announce API server stopped with an error");
    }

    info!(
        pending = state.dispatcher.pending_len(),
        "Draining announcement queue before exit"
    );
    state.dispatcher.shutdown().await;

    served
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthChecker::check_all(&state.dispatcher);

    // Degraded still answers 200 so a disabled subsystem does not fail liveness.
    (StatusCode::OK, Json(health))
}

async fn announce_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.status_report())
}

async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<GameEvent>,
) -> impl IntoResponse {
    debug!(kind = event.kind(), "Game event received");

    let announced = state.announce(&event);

    (StatusCode::ACCEPTED, Json(EventAccepted { announced }))
}
