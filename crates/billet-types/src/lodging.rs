//! Lodging entities: room types, rooms, and accommodation requests.
//!
//! These are plain records. Invariants that span several records (room
//! capacity, "at most one room per request") are enforced by the room
//! layer, which loads, validates, and commits them together.
//!
//! Every persisted record carries a `version`. The store bumps it on each
//! update and rejects writes made against a stale version.

use serde::{Deserialize, Serialize};

use crate::{ProjectId, RequestId, RoomId, RoomTypeId, UserId};

// ---------------------------------------------------------------------------
// RoomType
// ---------------------------------------------------------------------------

/// A category of lodging offered by a project ("tent spot", "4-bed dorm").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Assigned by the store on insert.
    pub id: RoomTypeId,
    pub project_id: ProjectId,
    pub name: String,
    /// Price per person, in the project's currency units.
    pub cost: i32,
    /// How many players fit in one room of this type.
    pub capacity: u32,
    pub description: String,
    /// Masters may let the platform fill these rooms automatically.
    pub is_auto_filled: bool,
    /// Rooms of this type never run out of space (e.g. a camping field).
    pub is_infinite: bool,
    /// Players may pick this type themselves when registering.
    pub is_player_selectable: bool,
    pub version: u64,
}

impl RoomType {
    /// Builds an unsaved room type from a draft. The id is a placeholder
    /// until the store assigns one.
    pub fn from_draft(draft: RoomTypeDraft) -> Self {
        Self {
            id: draft.id.unwrap_or(RoomTypeId(0)),
            project_id: draft.project_id,
            name: draft.name,
            cost: draft.cost,
            capacity: draft.capacity,
            description: draft.description,
            is_auto_filled: draft.is_auto_filled,
            is_infinite: draft.is_infinite,
            is_player_selectable: draft.is_player_selectable,
            version: 0,
        }
    }

    /// Overwrites every editable attribute with the draft's values.
    ///
    /// Identity, project, and version are left alone.
    pub fn apply(&mut self, draft: RoomTypeDraft) {
        self.name = draft.name;
        self.cost = draft.cost;
        self.capacity = draft.capacity;
        self.description = draft.description;
        self.is_auto_filled = draft.is_auto_filled;
        self.is_infinite = draft.is_infinite;
        self.is_player_selectable = draft.is_player_selectable;
    }
}

/// Input for creating (`id == None`) or editing (`id == Some`) a room type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomTypeDraft {
    pub id: Option<RoomTypeId>,
    pub project_id: ProjectId,
    pub name: String,
    pub cost: i32,
    pub capacity: u32,
    pub description: String,
    pub is_auto_filled: bool,
    pub is_infinite: bool,
    pub is_player_selectable: bool,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A bookable room. Belongs to exactly one project and one room type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Assigned by the store on insert.
    pub id: RoomId,
    pub project_id: ProjectId,
    pub room_type_id: RoomTypeId,
    pub name: String,
    /// Per-room capacity. `None` inherits the room type's capacity.
    #[serde(default)]
    pub capacity_override: Option<u32>,
    pub version: u64,
}

impl Room {
    /// Builds an unsaved room of the given type.
    pub fn new(
        project_id: ProjectId,
        room_type_id: RoomTypeId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: RoomId(0),
            project_id,
            room_type_id,
            name: name.into(),
            capacity_override: None,
            version: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// AccommodationRequest
// ---------------------------------------------------------------------------

/// A player taking part in an accommodation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub player: UserId,
    pub display_name: String,
}

impl Subject {
    pub fn new(player: UserId, display_name: impl Into<String>) -> Self {
        Self {
            player,
            display_name: display_name.into(),
        }
    }
}

/// One or more players asking to be lodged together.
///
/// The room assignment is a single optional reference. There is no
/// separate "room object" field to keep in sync: `None` means unassigned,
/// `Some(room)` means assigned, and the only way to change it is through
/// [`assign_to`](Self::assign_to) and [`vacate`](Self::vacate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationRequest {
    /// Assigned by the store on insert.
    pub id: RequestId,
    pub project_id: ProjectId,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    room: Option<RoomId>,
    pub version: u64,
}

impl AccommodationRequest {
    /// Builds an unsaved, unassigned request.
    pub fn new(project_id: ProjectId, subjects: Vec<Subject>) -> Self {
        Self {
            id: RequestId(0),
            project_id,
            subjects,
            room: None,
            version: 0,
        }
    }

    /// The room this request currently occupies, if any.
    pub fn assigned_room(&self) -> Option<RoomId> {
        self.room
    }

    pub fn is_assigned(&self) -> bool {
        self.room.is_some()
    }

    /// Points the request at `room`. Returns the room it was in before.
    pub fn assign_to(&mut self, room: RoomId) -> Option<RoomId> {
        self.room.replace(room)
    }

    /// Clears the assignment. Returns the room it was in before.
    pub fn vacate(&mut self) -> Option<RoomId> {
        self.room.take()
    }

    /// How many beds this request needs.
    pub fn occupant_count(&self) -> usize {
        self.subjects.len()
    }

    /// The players in this request, in subject order.
    pub fn players(&self) -> impl Iterator<Item = UserId> + '_ {
        self.subjects.iter().map(|s| s.player)
    }
}
