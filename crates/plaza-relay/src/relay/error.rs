use crate::session::SessionId;
use thiserror::Error;

/// Errors returned by relay operations
///
/// None of these are fatal to the relay or to the calling connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The session is not (or no longer) registered
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
}

impl RelayError {
    /// Session the error refers to
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::UnknownSession(id) => id,
        }
    }
}
