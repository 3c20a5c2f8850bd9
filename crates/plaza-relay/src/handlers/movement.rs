//! Movement handler (op 2)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::MovePayload;
use crate::relay::SessionRelay;
use std::sync::Arc;

/// Handles position and facing reports
pub struct MoveHandler;

impl MoveHandler {
    /// Store the reported state and relay it to every other client
    pub fn handle(
        relay: &SessionRelay,
        connection: &Arc<Connection>,
        payload: MovePayload,
    ) -> HandlerResult<()> {
        relay.update_position(connection.session_id(), payload.into())?;

        tracing::trace!(
            session_id = %connection.session_id(),
            x = payload.position.x,
            y = payload.position.y,
            z = payload.position.z,
            facing = payload.facing,
            "Move relayed"
        );

        Ok(())
    }
}
