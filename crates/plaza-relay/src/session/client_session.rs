//! Per-client session record

use super::SessionId;
use serde::{Deserialize, Serialize};

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The world origin
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Position and facing of one player, as last reported by its client
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Yaw angle in radians
    pub facing: f64,
}

/// Server-side record of one connected client
///
/// The relay does not validate or clamp anything stored here; each move
/// overwrites the previous state wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSession {
    pub id: SessionId,
    pub position: Vec3,
    pub facing: f64,
}

impl ClientSession {
    /// Create a session at the origin, facing zero
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            position: Vec3::ORIGIN,
            facing: 0.0,
        }
    }

    /// Replace the stored state with a client report
    pub fn apply(&mut self, state: PlayerState) {
        self.position = state.position;
        self.facing = state.facing;
    }

    /// Current position and facing
    #[must_use]
    pub fn state(&self) -> PlayerState {
        PlayerState {
            position: self.position,
            facing: self.facing,
        }
    }
}
