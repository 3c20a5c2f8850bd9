//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::{HandlerError, MessageDispatcher};
use crate::protocol::{GatewayMessage, OpCode};
use crate::server::RelayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

/// How long a closing connection's writer may take to flush
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket relay handler
pub async fn gateway_handler(
    State(state): State<RelayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: RelayState, socket: WebSocket) {
    let session_config = state.config().session.clone();

    // The registry entry holds the only sender; dropping it ends this socket
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(session_config.outbound_buffer);
    let session_id = state.relay().connect(tx);

    let connection = Connection::new(session_id.clone());
    connection.set_state(ConnectionState::Active).await;

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let state_recv = state.clone();
    let connection_recv = connection.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            connection_recv.touch().await;

            match msg {
                Ok(Message::Text(text)) => {
                    if !handle_text_message(&state_recv, &connection_recv, &text) {
                        return;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %connection_recv.session_id(),
                        "Binary frames are not supported, dropping"
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong is handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(
                        session_id = %connection_recv.session_id(),
                        "Client closed connection"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %connection_recv.session_id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    let connection_send = connection.clone();
    let write_timeout = Duration::from_millis(session_config.heartbeat_timeout_ms);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let msg = if msg.op == OpCode::Dispatch {
                msg.with_sequence(connection_send.next_sequence())
            } else {
                msg
            };

            let json = match msg.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(
                        session_id = %connection_send.session_id(),
                        error = %e,
                        "Failed to encode outbound message"
                    );
                    continue;
                }
            };

            match timeout(write_timeout, ws_sink.send(Message::Text(json.into()))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        session_id = %connection_send.session_id(),
                        error = %e,
                        "Failed to send message to WebSocket"
                    );
                    return;
                }
                Err(_) => {
                    tracing::warn!(
                        session_id = %connection_send.session_id(),
                        timeout_ms = write_timeout.as_millis(),
                        "WebSocket write stalled, closing connection"
                    );
                    return;
                }
            }
        }

        // Queue closed: the session was removed from the registry
        let _ = timeout(write_timeout, ws_sink.close()).await;
    });

    let connection_hb = connection.clone();
    let idle_timeout = Duration::from_millis(session_config.heartbeat_timeout_ms);
    let check_every = Duration::from_millis((session_config.heartbeat_interval_ms / 2).max(1));

    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(check_every);

        loop {
            check_interval.tick().await;

            if !connection_hb.is_active().await {
                break;
            }

            let idle = connection_hb.time_since_activity().await;
            if idle > idle_timeout {
                tracing::warn!(
                    session_id = %connection_hb.session_id(),
                    idle_ms = idle.as_millis(),
                    "Connection timed out (no inbound activity)"
                );
                break;
            }
        }
    });

    let send_finished = tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
            false
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            true
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(session_id = %session_id, "Heartbeat task ended");
            false
        }
    };

    recv_task.abort();
    heartbeat_task.abort();

    cleanup_connection(&state, &connection).await;

    // Deregistering dropped the queue sender; let the writer flush and close
    if !send_finished
        && timeout(WRITER_DRAIN_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        send_task.abort();
    }
}

/// Handle a text message from the client
///
/// Anything that cannot be decoded or handled is logged and dropped; the
/// connection stays open. Returns `false` once this connection's own session
/// is no longer registered (it was evicted), which ends the connection.
fn handle_text_message(state: &RelayState, connection: &Arc<Connection>, text: &str) -> bool {
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse message, dropping"
            );
            return true;
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message) {
        Ok(()) => true,
        Err(HandlerError::Relay(e)) if e.session_id() == connection.session_id() => {
            tracing::info!(
                session_id = %connection.session_id(),
                "Session no longer registered, closing connection"
            );
            false
        }
        Err(e) => {
            log_handler_error(connection, &e);
            true
        }
    }
}

fn log_handler_error(connection: &Connection, error: &HandlerError) {
    match error {
        HandlerError::Relay(_) => tracing::info!(
            session_id = %connection.session_id(),
            kind = error.kind(),
            error = %error,
            "Ignoring message for unregistered session"
        ),
        HandlerError::InvalidPayload(_) | HandlerError::ServerOnlyOp(_) => tracing::debug!(
            session_id = %connection.session_id(),
            kind = error.kind(),
            error = %error,
            "Dropping malformed message"
        ),
    }
}

/// Clean up a connection on disconnect
async fn cleanup_connection(state: &RelayState, connection: &Arc<Connection>) {
    let previous_state = connection.state().await;
    connection.set_state(ConnectionState::Disconnected).await;

    let was_registered = state.relay().disconnect(connection.session_id());

    tracing::info!(
        session_id = %connection.session_id(),
        previous_state = ?previous_state,
        already_removed = !was_registered,
        age_ms = connection.age().as_millis(),
        "Connection closed"
    );
}
