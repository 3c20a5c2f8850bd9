//! Plaza relay server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p plaza-relay
//! ```
//!
//! Configuration is loaded from environment variables.

use plaza_common::{try_init_tracing_with_config, AppConfig, AppResult, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Tracing depends on the environment, so config comes first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::from_app_config(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, details = ?e, code = e.error_code(), "Relay failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> AppResult<()> {
    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.relay.port,
        outbound_buffer = config.session.outbound_buffer,
        heartbeat_interval_ms = config.session.heartbeat_interval_ms,
        "Configuration loaded"
    );

    plaza_relay::run(config).await
}
