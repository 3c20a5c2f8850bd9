//! Heartbeat handler (op 1)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use crate::relay::SessionRelay;
use std::sync::Arc;

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Answer a heartbeat with an ACK to the same client only
    ///
    /// Activity itself was already recorded by the receive loop.
    pub fn handle(relay: &SessionRelay, connection: &Arc<Connection>) -> HandlerResult<()> {
        tracing::trace!(
            session_id = %connection.session_id(),
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        relay.send_to(connection.session_id(), GatewayMessage::heartbeat_ack())?;
        Ok(())
    }
}
