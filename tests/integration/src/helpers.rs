//! Test helpers for integration tests
//!
//! Provides a relay server bound to an ephemeral port, plus polling helpers
//! for state that settles asynchronously.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use plaza_common::AppConfig;
use plaza_relay::server::run_server;
use plaza_relay::{create_app, create_relay_state, RelayState};
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long polling helpers wait before giving up
const SETTLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: RelayState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a new test server with default settings
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let state = create_relay_state(config);
        let app = create_app(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let relay = state.relay_handle();
        let shutdown = async move {
            let _ = shutdown_rx.await;
            relay.shutdown();
        };

        let handle = tokio::spawn(async move {
            run_server(listener, app, shutdown).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shared relay state, for inspecting the registry directly
    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Number of sessions currently registered
    pub fn session_count(&self) -> usize {
        self.state.relay().session_count()
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Wait until the registry holds exactly `expected` sessions
    pub async fn wait_for_sessions(&self, expected: usize) -> Result<()> {
        let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
        loop {
            let count = self.session_count();
            if count == expected {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("Expected {expected} sessions, registry holds {count}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Trigger graceful shutdown and wait for the serve loop to exit
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(SETTLE_TIMEOUT, handle).await??;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Create a test configuration
///
/// Defaults only; the process environment is not read.
pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// Configuration with a short heartbeat window for liveness tests
pub fn fast_heartbeat_config(interval_ms: u64, timeout_ms: u64) -> AppConfig {
    let mut config = test_config();
    config.session.heartbeat_interval_ms = interval_ms;
    config.session.heartbeat_timeout_ms = timeout_ms;
    config
}
