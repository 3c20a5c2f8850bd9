//! # plaza-relay
//!
//! Real-time session relay: tracks each connected client's position and
//! facing, and fans join, move, leave, and chat events out to everyone else.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod server;
pub mod session;

pub use relay::{RelayError, SessionRelay};
pub use server::{create_app, create_relay_state, run, RelayState};
