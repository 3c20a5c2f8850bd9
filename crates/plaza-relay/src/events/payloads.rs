//! Event payload definitions
//!
//! Defines the data structures for each dispatch event.

use crate::session::{PlayerState, SessionId, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SNAPSHOT event payload
///
/// State of every *other* session at the moment the receiver joined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEvent {
    pub players: BTreeMap<SessionId, PlayerState>,
}

/// PLAYER_JOINED event payload
///
/// Carries only the ID; the joiner sits at the origin until it first moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoinedEvent {
    pub id: SessionId,
}

/// PLAYER_MOVED event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMovedEvent {
    pub id: SessionId,
    pub position: Vec3,
    pub facing: f64,
}

impl PlayerMovedEvent {
    #[must_use]
    pub fn new(id: SessionId, state: PlayerState) -> Self {
        Self {
            id,
            position: state.position,
            facing: state.facing,
        }
    }
}

/// PLAYER_LEFT event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLeftEvent {
    pub id: SessionId,
}

/// CHAT_MESSAGE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    /// Sender
    pub id: SessionId,
    pub text: String,
    /// Server receive time, Unix milliseconds
    pub sent_at: i64,
}
