//! Session relay
//!
//! Every mutation takes the registry write lock once and performs the state
//! change and its fan-out inside that critical section. Fan-out never waits
//! on a receiver, so the lock is never held across I/O. Because enqueue order
//! follows lock order, each recipient sees `PLAYER_JOINED` for a session
//! before any `PLAYER_MOVED` for it, and nothing for it after `PLAYER_LEFT`.

use crate::broadcast::{deliver_to, fan_out, Recipients};
use crate::events::{
    ChatMessageEvent, PlayerJoinedEvent, PlayerLeftEvent, PlayerMovedEvent, RelayEventType,
    SnapshotEvent,
};
use crate::protocol::{GatewayMessage, HelloPayload};
use crate::registry::{Outbound, Registry};
use crate::session::{ClientSession, PlayerState, SessionId};
use parking_lot::RwLock;
use plaza_common::SessionConfig;
use std::sync::Arc;

use super::RelayError;

/// Tracks connected sessions and propagates their state changes
#[derive(Debug)]
pub struct SessionRelay {
    registry: RwLock<Registry>,
    /// Advertised to clients in Hello
    heartbeat_interval_ms: u64,
}

impl SessionRelay {
    /// Create a relay with an empty registry
    #[must_use]
    pub fn new(heartbeat_interval_ms: u64) -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            heartbeat_interval_ms,
        }
    }

    /// Create a relay wrapped in Arc
    #[must_use]
    pub fn new_shared(heartbeat_interval_ms: u64) -> Arc<Self> {
        Arc::new(Self::new(heartbeat_interval_ms))
    }

    /// Create a relay from session configuration
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.heartbeat_interval_ms)
    }

    /// Heartbeat interval advertised in Hello
    #[must_use]
    pub fn heartbeat_interval_ms(&self) -> u64 {
        self.heartbeat_interval_ms
    }

    /// Register a new client
    ///
    /// Queues Hello and the snapshot of every other session on `outbound`,
    /// then announces the new ID to everyone else. If the new client's own
    /// queue cannot take its Hello or snapshot, it is dropped again without
    /// being announced.
    pub fn connect(&self, outbound: Outbound) -> SessionId {
        let mut registry = self.registry.write();
        let id = registry.allocate_id();

        let hello = GatewayMessage::hello(&HelloPayload::new(
            id.clone(),
            self.heartbeat_interval_ms,
        ));
        let snapshot = GatewayMessage::event(
            RelayEventType::Snapshot,
            &SnapshotEvent {
                players: registry.snapshot_except(&id),
            },
        );

        if let Err(reason) =
            deliver_to(&outbound, hello).and_then(|()| deliver_to(&outbound, snapshot))
        {
            tracing::warn!(
                session_id = %id,
                reason = ?reason,
                "New session could not take its snapshot, not registering"
            );
            return id;
        }

        registry.insert(ClientSession::new(id.clone()), outbound);

        let joined = GatewayMessage::event(
            RelayEventType::PlayerJoined,
            &PlayerJoinedEvent { id: id.clone() },
        );
        let report = fan_out(&registry, &joined, &Recipients::AllExcept(id.clone()));
        Self::evict(&mut registry, report.failed);

        tracing::info!(
            session_id = %id,
            sessions = registry.len(),
            "Session connected"
        );

        id
    }

    /// Overwrite a session's position and facing and tell everyone else
    ///
    /// The sender never receives its own move.
    pub fn update_position(&self, id: &SessionId, state: PlayerState) -> Result<(), RelayError> {
        let mut registry = self.registry.write();

        if !registry.update(id, state) {
            return Err(RelayError::UnknownSession(id.clone()));
        }

        let moved = GatewayMessage::event(
            RelayEventType::PlayerMoved,
            &PlayerMovedEvent::new(id.clone(), state),
        );
        let report = fan_out(&registry, &moved, &Recipients::AllExcept(id.clone()));
        if !report.is_clean() {
            Self::evict(&mut registry, report.failed);
        }

        Ok(())
    }

    /// Send a chat line to every session, the sender included
    pub fn chat(&self, id: &SessionId, text: String) -> Result<(), RelayError> {
        let mut registry = self.registry.write();

        if !registry.contains(id) {
            return Err(RelayError::UnknownSession(id.clone()));
        }

        let event = ChatMessageEvent {
            id: id.clone(),
            text,
            sent_at: chrono::Utc::now().timestamp_millis(),
        };
        let message = GatewayMessage::event(RelayEventType::ChatMessage, &event);
        let report = fan_out(&registry, &message, &Recipients::All);

        tracing::debug!(
            session_id = %id,
            delivered = report.delivered,
            "Chat relayed"
        );

        if !report.is_clean() {
            Self::evict(&mut registry, report.failed);
        }

        Ok(())
    }

    /// Queue a message for a single session
    ///
    /// A session whose queue refuses the message is evicted.
    pub fn send_to(&self, id: &SessionId, message: GatewayMessage) -> Result<(), RelayError> {
        let mut registry = self.registry.write();

        let outbound = registry
            .outbound(id)
            .ok_or_else(|| RelayError::UnknownSession(id.clone()))?;

        if let Err(reason) = deliver_to(outbound, message) {
            tracing::debug!(session_id = %id, reason = ?reason, "Direct delivery failed");
            Self::evict(&mut registry, vec![id.clone()]);
        }

        Ok(())
    }

    /// Remove a session and announce its departure
    ///
    /// Returns `false` if the session was already gone (for example, evicted).
    pub fn disconnect(&self, id: &SessionId) -> bool {
        let mut registry = self.registry.write();

        if registry.remove(id).is_none() {
            return false;
        }

        let failed = Self::announce_left(&registry, id);
        Self::evict(&mut registry, failed);

        tracing::info!(
            session_id = %id,
            sessions = registry.len(),
            "Session disconnected"
        );

        true
    }

    /// Copy of every registered session
    #[must_use]
    pub fn snapshot(&self) -> Vec<ClientSession> {
        self.registry.read().sessions()
    }

    /// Copy of one session
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<ClientSession> {
        self.registry.read().get(id)
    }

    /// Check if a session is registered
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.registry.read().contains(id)
    }

    /// Number of registered sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Drop every session
    ///
    /// Releases every outbound queue, which ends each connection. No
    /// `PLAYER_LEFT` is sent.
    pub fn shutdown(&self) -> usize {
        let cleared = self.registry.write().clear();
        tracing::info!(sessions = cleared, "Relay registry cleared");
        cleared
    }

    fn announce_left(registry: &Registry, id: &SessionId) -> Vec<SessionId> {
        let left = GatewayMessage::event(
            RelayEventType::PlayerLeft,
            &PlayerLeftEvent { id: id.clone() },
        );
        fan_out(registry, &left, &Recipients::All).failed
    }

    /// Remove sessions that could not take a message
    ///
    /// Each eviction is itself announced, which can fail further recipients;
    /// loops until nothing else fails.
    fn evict(registry: &mut Registry, mut pending: Vec<SessionId>) {
        while let Some(id) = pending.pop() {
            if registry.remove(&id).is_none() {
                continue;
            }

            tracing::warn!(session_id = %id, "Evicting session with stalled outbound queue");
            pending.extend(Self::announce_left(registry, &id));
        }
    }
}
