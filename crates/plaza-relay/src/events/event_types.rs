//! Relay event types
//!
//! Defines all event type names for dispatch messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relay event types
///
/// These are the event names sent in the `t` field of dispatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayEventType {
    /// Every other session's state, sent once right after Hello
    Snapshot,
    /// Another client connected
    PlayerJoined,
    /// Another client reported a new position/facing
    PlayerMoved,
    /// Another client disconnected
    PlayerLeft,
    /// Chat line from any client, including the receiver
    ChatMessage,
}

impl RelayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "SNAPSHOT",
            Self::PlayerJoined => "PLAYER_JOINED",
            Self::PlayerMoved => "PLAYER_MOVED",
            Self::PlayerLeft => "PLAYER_LEFT",
            Self::ChatMessage => "CHAT_MESSAGE",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SNAPSHOT" => Some(Self::Snapshot),
            "PLAYER_JOINED" => Some(Self::PlayerJoined),
            "PLAYER_MOVED" => Some(Self::PlayerMoved),
            "PLAYER_LEFT" => Some(Self::PlayerLeft),
            "CHAT_MESSAGE" => Some(Self::ChatMessage),
            _ => None,
        }
    }
}

impl fmt::Display for RelayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RelayEventType> for String {
    fn from(event: RelayEventType) -> Self {
        event.as_str().to_string()
    }
}
