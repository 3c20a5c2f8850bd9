//! Session relay
//!
//! Owns the registry and performs every state change together with the
//! fan-out it causes.

mod error;
mod session_relay;

pub use error::RelayError;
pub use session_relay::SessionRelay;
