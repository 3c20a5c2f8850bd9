//! Relay server setup
//!
//! Provides the WebSocket server configuration, routes and shutdown wiring.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::RelayState;

use crate::relay::SessionRelay;
use axum::{routing::get, Router};
use plaza_common::{AppConfig, AppError, AppResult};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the relay router
///
/// When `static_dir` is set, every path not matched by a route is served
/// from that directory.
pub fn create_router(static_dir: Option<&Path>) -> Router<RelayState> {
    let router = Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check));

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: RelayState) -> Router {
    create_router(state.config().static_files.dir.as_deref())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `RelayState` with an empty registry
#[must_use]
pub fn create_relay_state(config: AppConfig) -> RelayState {
    let relay = Arc::new(SessionRelay::from_config(&config.session));
    RelayState::new(relay, config)
}

/// Serve `app` on an already bound listener until `shutdown` resolves
///
/// # Errors
/// Returns an error if the serve loop fails
pub async fn run_server<F>(listener: TcpListener, app: Router, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Relay listening on ws://{}/gateway", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::internal)
}

/// Run the complete relay server with configuration
///
/// # Errors
/// Returns an error if the listener cannot be bound or the serve loop fails
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.relay.address();

    tracing::info!("Starting relay server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::server(format!("Failed to bind to {addr}: {e}")))?;

    if let Some(dir) = &config.static_files.dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
    }

    let state = create_relay_state(config);
    let relay = state.relay_handle();
    let app = create_app(state);

    // Open sockets would hold graceful shutdown forever; clearing the
    // registry closes every one of them.
    let shutdown = async move {
        shutdown_signal().await;
        relay.shutdown();
    };

    run_server(listener, app, shutdown).await?;

    tracing::info!("Relay server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
