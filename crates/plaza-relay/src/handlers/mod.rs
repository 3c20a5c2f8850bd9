//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod chat;
mod error;
mod heartbeat;
mod movement;

pub use chat::ChatHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use movement::MoveHandler;

use crate::connection::Connection;
use crate::protocol::{GatewayMessage, OpCode};
use crate::server::RelayState;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub fn dispatch(
        state: &RelayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<()> {
        if !message.op.is_client_op() {
            return Err(HandlerError::ServerOnlyOp(message.op));
        }

        let relay = state.relay();

        match message.op {
            OpCode::Heartbeat => HeartbeatHandler::handle(relay, connection),
            OpCode::Move => {
                let payload = message.as_move().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Move payload".to_string())
                })?;

                MoveHandler::handle(relay, connection, payload)
            }
            OpCode::Chat => {
                let payload = message.as_chat().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Chat payload".to_string())
                })?;

                ChatHandler::handle(relay, connection, payload)
            }
            // Unreachable past the is_client_op check
            op => Err(HandlerError::ServerOnlyOp(op)),
        }
    }
}
