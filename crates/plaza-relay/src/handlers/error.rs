//! Handler error types

use crate::protocol::OpCode;
use crate::relay::RelayError;
use thiserror::Error;

/// Handler error type
///
/// Every variant is logged and the offending frame dropped; none of them
/// close the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload missing or missing fields
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Client sent an op only the server may send
    #[error("Server-only op code from client: {0}")]
    ServerOnlyOp(OpCode),

    /// Relay rejected the operation
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

impl HandlerError {
    /// Short label for log fields
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::ServerOnlyOp(_) => "server_only_op",
            Self::Relay(RelayError::UnknownSession(_)) => "unknown_session",
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
