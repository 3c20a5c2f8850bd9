//! Relay events
//!
//! Defines all dispatch events sent by the relay to clients.

mod event_types;
mod payloads;

pub use event_types::RelayEventType;
pub use payloads::{
    ChatMessageEvent, PlayerJoinedEvent, PlayerLeftEvent, PlayerMovedEvent, SnapshotEvent,
};
