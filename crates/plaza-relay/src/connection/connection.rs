//! Individual WebSocket connection
//!
//! Handler-local bookkeeping for one socket. The relay never sees this; it
//! only knows the session ID and outbound queue.

use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Socket upgraded, session not yet registered
    Connecting,
    /// Registered and relaying
    Active,
    /// Closed; terminal
    Disconnected,
}

/// A single WebSocket connection
#[derive(Debug)]
pub struct Connection {
    session_id: SessionId,

    state: RwLock<ConnectionState>,

    /// Last Dispatch sequence number sent
    sequence: AtomicU64,

    /// Last inbound frame of any kind
    last_activity: RwLock<Instant>,

    created_at: Instant,
}

impl Connection {
    /// Create a new connection in the `Connecting` state
    #[must_use]
    pub fn new(session_id: SessionId) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            session_id,
            state: RwLock::new(ConnectionState::Connecting),
            sequence: AtomicU64::new(0),
            last_activity: RwLock::new(now),
            created_at: now,
        })
    }

    /// Get the session ID
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Get the current state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Set the connection state
    ///
    /// `Disconnected` is terminal and is never left once entered.
    pub async fn set_state(&self, state: ConnectionState) {
        let mut current = self.state.write().await;
        if *current != ConnectionState::Disconnected {
            *current = state;
        }
    }

    /// Check if the connection is relaying
    pub async fn is_active(&self) -> bool {
        *self.state.read().await == ConnectionState::Active
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    #[must_use]
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record inbound activity
    pub async fn touch(&self) {
        *self.last_activity.write().await = Instant::now();
    }

    /// Time since the last inbound frame
    pub async fn time_since_activity(&self) -> Duration {
        self.last_activity.read().await.elapsed()
    }

    /// Get connection age
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
