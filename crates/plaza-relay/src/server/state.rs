//! Relay state
//!
//! Application state for the relay server.

use crate::relay::SessionRelay;
use plaza_common::AppConfig;
use std::sync::Arc;

/// Relay application state
///
/// Cheap to clone; every connection task holds one.
#[derive(Clone)]
pub struct RelayState {
    /// Session relay owning the registry
    relay: Arc<SessionRelay>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl RelayState {
    /// Create a new relay state
    #[must_use]
    pub fn new(relay: Arc<SessionRelay>, config: AppConfig) -> Self {
        Self {
            relay,
            config: Arc::new(config),
        }
    }

    /// Get the session relay
    #[must_use]
    pub fn relay(&self) -> &SessionRelay {
        &self.relay
    }

    /// Get a shared handle to the session relay
    #[must_use]
    pub fn relay_handle(&self) -> Arc<SessionRelay> {
        Arc::clone(&self.relay)
    }

    /// Get the application configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayState")
            .field("sessions", &self.relay.session_count())
            .field("config", &"AppConfig")
            .finish()
    }
}
