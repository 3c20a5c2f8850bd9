//! Integration test utilities for the plaza relay
//!
//! This crate provides helpers for running end-to-end tests against the
//! relay over real HTTP and WebSocket connections.

pub mod helpers;
pub mod ws_client;

pub use helpers::*;
pub use ws_client::*;
