//! Control payload definitions
//!
//! Payloads for Hello (server) and Move / Chat (client).

use crate::session::{PlayerState, SessionId, Vec3};
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection, before the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// ID assigned to the receiving client
    pub session_id: SessionId,
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub fn new(session_id: SessionId, heartbeat_interval: u64) -> Self {
        Self {
            session_id,
            heartbeat_interval,
        }
    }
}

/// Payload for op 2 (Move)
///
/// Sent by the client whenever its local player moves. Fully replaces the
/// stored state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePayload {
    pub position: Vec3,
    /// Yaw in radians. `rotationY` is accepted for older clients.
    #[serde(alias = "rotationY")]
    pub facing: f64,
}

impl From<MovePayload> for PlayerState {
    fn from(payload: MovePayload) -> Self {
        Self {
            position: payload.position,
            facing: payload.facing,
        }
    }
}

/// Payload for op 3 (Chat)
///
/// Clients may send either `{"text": "..."}` or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatPayload {
    Object { text: String },
    Text(String),
}

impl ChatPayload {
    /// The chat text, unmodified
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Object { text } | Self::Text(text) => text,
        }
    }
}
