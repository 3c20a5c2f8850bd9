//! Relay protocol definitions
//!
//! Defines the WebSocket protocol: op codes, the message envelope, and
//! control payloads.

mod messages;
mod opcodes;
mod payloads;

pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{ChatPayload, HelloPayload, MovePayload};
