//! Accommodation configuration.

use serde::{Deserialize, Serialize};

/// What occupying a room does to a request that already holds another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReassignPolicy {
    /// Leave the previous room and enter the new one in a single commit.
    /// Both rooms get a notification.
    #[default]
    MoveBetweenRooms,
    /// Fail with `AlreadyAssigned`; the request must be vacated first.
    RejectReassignment,
}

/// Settings for the inventory and assignment services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccommodationConfig {
    pub reassignment: ReassignPolicy,

    /// Most rooms a single `add_rooms` call may create, after range
    /// expansion.
    pub max_rooms_per_batch: usize,
}

impl Default for AccommodationConfig {
    fn default() -> Self {
        Self {
            reassignment: ReassignPolicy::default(),
            max_rooms_per_batch: 500,
        }
    }
}
