//! Broadcast module
//!
//! Non-blocking delivery of events to many sessions.

mod fanout;

pub use fanout::{deliver_to, fan_out, DeliveryFailure, FanOutReport, Recipients};
