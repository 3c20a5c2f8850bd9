//! Chat handler (op 3)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::ChatPayload;
use crate::relay::SessionRelay;
use std::sync::Arc;

/// Handles chat lines
pub struct ChatHandler;

impl ChatHandler {
    /// Relay the text, unmodified, to every client including the sender
    pub fn handle(
        relay: &SessionRelay,
        connection: &Arc<Connection>,
        payload: ChatPayload,
    ) -> HandlerResult<()> {
        let text = payload.into_text();
        let length = text.len();

        relay.chat(connection.session_id(), text)?;

        tracing::debug!(
            session_id = %connection.session_id(),
            length,
            "Chat received"
        );

        Ok(())
    }
}
