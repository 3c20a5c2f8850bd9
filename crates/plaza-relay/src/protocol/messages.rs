//! Relay message format
//!
//! Defines the envelope shared by every frame on the WebSocket.

use super::{ChatPayload, HelloPayload, MovePayload, OpCode};
use crate::events::RelayEventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relay message envelope
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (only for op=0 Dispatch)
    ///
    /// Stamped by the connection's writer just before the frame is sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Server Messages ===

    /// Create a Dispatch message (op=0) carrying a typed event payload
    #[must_use]
    pub fn event<T: Serialize>(event_type: RelayEventType, payload: &T) -> Self {
        Self::dispatch(event_type, serde_json::to_value(payload).unwrap_or_default())
    }

    /// Create a Dispatch message (op=0) from raw data
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: None,
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: &HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    /// Attach a sequence number to a Dispatch message
    #[must_use]
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        if self.op == OpCode::Dispatch {
            self.s = Some(sequence);
        }
        self
    }

    // === Parsing Client Messages ===

    /// Try to parse as a Move payload (op=2)
    pub fn as_move(&self) -> Option<MovePayload> {
        if self.op != OpCode::Move {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as a Chat payload (op=3)
    pub fn as_chat(&self) -> Option<ChatPayload> {
        if self.op != OpCode::Chat {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Event type of a Dispatch message
    #[must_use]
    pub fn event_type(&self) -> Option<RelayEventType> {
        self.t.as_deref().and_then(RelayEventType::parse)
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
