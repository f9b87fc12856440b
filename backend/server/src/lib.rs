//! Gift redemption server.
//!
//! # Endpoints
//! - `GET /lookup?staff_pass_id=..`: staff pass to team
//! - `POST /redemption` with `{"staff_pass_id": ".."}`: claim the team's one gift
//! - `GET /redemption?team_name=..`: whether a team already claimed
//! - `GET /health`
//!
//! # Configuration
//! - `--db <path>`: SQLite file, default `gifts.db`, created if missing
//! - `--csv <path>`: optional staff mapping imported before serving
//! - `RUST_PORT`: listen port, default 3000
//! - `ALLOWED_ORIGINS`: comma separated CORS allow list
//! - `RUST_LOG`: tracing filter
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use config::{Args, Config};
use routes::{health_handler, lookup_handler, redemption_handler, status_handler};
use state::AppState;

pub async fn start_server(args: Args) -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let config = Config::load(args)?;
    let state = AppState::new(config).context("Failed to initialize state")?;

    info!("Starting server...");

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.config.allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/lookup", get(lookup_handler))
        .route("/redemption", get(status_handler).post(redemption_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
