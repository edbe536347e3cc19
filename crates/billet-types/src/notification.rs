//! Notification payloads emitted after a room assignment is committed.
//!
//! The room layer builds a [`RoomNotification`] once the store has accepted
//! a change. The notifier wraps it in a [`NotificationEnvelope`] (sequence
//! number + timestamp) before handing it to a sink, so a downstream mailer
//! can detect gaps or duplicates.

use serde::{Deserialize, Serialize};

use crate::{ProjectId, RequestId, RoomId, UserId};

/// What happened to the room.
///
/// `#[serde(rename_all = "PascalCase")]` keeps the outbox format stable:
/// `"Occupied"` / `"Vacated"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RoomChange {
    /// An accommodation request moved into the room.
    Occupied,
    /// An accommodation request left the room.
    Vacated,
}

/// "Request X moved into / out of room Y", addressed to everyone affected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomNotification {
    pub change: RoomChange,
    pub project_id: ProjectId,
    pub project_name: String,
    pub room_id: RoomId,
    pub room_name: String,
    pub request_id: RequestId,
    /// The master who performed the change.
    pub initiator: UserId,
    /// Players of the room's inhabitants plus the players of the changed
    /// request. Sorted, no duplicates.
    pub recipients: Vec<UserId>,
}

/// The unit a notification sink receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Per-notifier sequence number, starting at 1.
    pub seq: u64,
    /// Milliseconds since the notifier started.
    pub timestamp: u64,
    pub notification: RoomNotification,
}
