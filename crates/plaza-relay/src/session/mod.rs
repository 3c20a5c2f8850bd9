//! Session model
//!
//! Identity and last-reported state of one connected client.

mod client_session;
mod id;

pub use client_session::{ClientSession, PlayerState, Vec3};
pub use id::SessionId;
