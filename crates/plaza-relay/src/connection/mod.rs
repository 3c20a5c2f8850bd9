//! Connection tracking
//!
//! Per-socket state used by the server's receive, send and liveness tasks.

mod connection;

pub use connection::{Connection, ConnectionState};
