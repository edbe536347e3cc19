//! The unit of work handed to [`Store::commit`](crate::Store::commit).

use billet_types::{AccommodationRequest, Room, RoomId, RoomType, RoomTypeId};

/// A single write.
///
/// Updates and removals carry the version the caller loaded. Inserts ignore
/// the incoming id and version; the store assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    InsertRoomType(RoomType),
    UpdateRoomType(RoomType),
    RemoveRoomType { id: RoomTypeId, version: u64 },
    InsertRoom(Room),
    UpdateRoom(Room),
    RemoveRoom { id: RoomId, version: u64 },
    UpdateRequest(AccommodationRequest),
    /// Bumps a room's version without changing it. Used when the room's
    /// occupancy changes, so two writers that both computed free space
    /// from the same version can't both win.
    TouchRoom { id: RoomId, version: u64 },
}

/// An ordered batch of changes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) -> &mut Self {
        self.changes.push(change);
        self
    }

    pub fn insert_room_type(&mut self, room_type: RoomType) -> &mut Self {
        self.push(Change::InsertRoomType(room_type))
    }

    pub fn update_room_type(&mut self, room_type: RoomType) -> &mut Self {
        self.push(Change::UpdateRoomType(room_type))
    }

    pub fn remove_room_type(&mut self, room_type: &RoomType) -> &mut Self {
        self.push(Change::RemoveRoomType {
            id: room_type.id,
            version: room_type.version,
        })
    }

    pub fn insert_room(&mut self, room: Room) -> &mut Self {
        self.push(Change::InsertRoom(room))
    }

    pub fn update_room(&mut self, room: Room) -> &mut Self {
        self.push(Change::UpdateRoom(room))
    }

    pub fn remove_room(&mut self, room: &Room) -> &mut Self {
        self.push(Change::RemoveRoom {
            id: room.id,
            version: room.version,
        })
    }

    pub fn update_request(
        &mut self,
        request: AccommodationRequest,
    ) -> &mut Self {
        self.push(Change::UpdateRequest(request))
    }

    pub fn touch_room(&mut self, room: &Room) -> &mut Self {
        self.push(Change::TouchRoom {
            id: room.id,
            version: room.version,
        })
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Records inserted or updated by a commit, in change order, as the store
/// now holds them (ids assigned, versions bumped). Removals and touches
/// leave nothing here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Committed {
    pub room_types: Vec<RoomType>,
    pub rooms: Vec<Room>,
    pub requests: Vec<AccommodationRequest>,
}
