//! Event fan-out
//!
//! Pushes one message into many outbound queues without ever waiting on a
//! receiver. Recipients whose queue is full or closed are reported back so
//! the caller can evict them.

use crate::protocol::GatewayMessage;
use crate::registry::{Outbound, Registry};
use crate::session::SessionId;
use tokio::sync::mpsc::error::TrySendError;

/// Who receives a fanned-out message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Every registered session
    All,
    /// Every registered session except one
    AllExcept(SessionId),
}

impl Recipients {
    /// Check if a session is included
    #[must_use]
    pub fn includes(&self, id: &SessionId) -> bool {
        match self {
            Self::All => true,
            Self::AllExcept(excluded) => excluded != id,
        }
    }
}

/// Why a single delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The recipient's queue is at capacity
    Full,
    /// The recipient's writer has gone away
    Closed,
}

/// Outcome of a fan-out
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Number of queues the message was placed in
    pub delivered: usize,
    /// Sessions that could not take the message
    pub failed: Vec<SessionId>,
}

impl FanOutReport {
    /// Check if every recipient accepted the message
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Enqueue a message for one session without waiting
pub fn deliver_to(outbound: &Outbound, message: GatewayMessage) -> Result<(), DeliveryFailure> {
    match outbound.try_send(message) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => Err(DeliveryFailure::Full),
        Err(TrySendError::Closed(_)) => Err(DeliveryFailure::Closed),
    }
}

/// Enqueue a message for every matching session
///
/// Never blocks. A failure for one recipient does not affect the rest.
pub fn fan_out(
    registry: &Registry,
    message: &GatewayMessage,
    recipients: &Recipients,
) -> FanOutReport {
    let mut report = FanOutReport::default();

    for entry in registry.entries() {
        let id = &entry.session.id;
        if !recipients.includes(id) {
            continue;
        }

        match deliver_to(&entry.outbound, message.clone()) {
            Ok(()) => report.delivered += 1,
            Err(reason) => {
                tracing::debug!(
                    session_id = %id,
                    reason = ?reason,
                    event_type = ?message.t,
                    "Fan-out delivery failed"
                );
                report.failed.push(id.clone());
            }
        }
    }

    tracing::trace!(
        event_type = ?message.t,
        delivered = report.delivered,
        failed = report.failed.len(),
        "Fan-out complete"
    );

    report
}
