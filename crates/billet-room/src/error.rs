//! Error types for the accommodation layer.

use billet_access::AccessError;
use billet_store::StorageError;
use billet_types::{EntityKind, RequestId, RoomId};

/// Errors that can occur during inventory and assignment operations.
///
/// Every variant except `Storage` is raised before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum AccommodationError {
    /// The entity does not exist, or exists in another project.
    #[error("{kind} {id} not found")]
    EntityNotFound { kind: EntityKind, id: u64 },

    /// The acting user lacks the required capability.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The room can't take the request's subjects.
    #[error("room {room} has {free} free place(s), {requested} requested")]
    InsufficientRoomSpace {
        room: RoomId,
        free: i64,
        requested: usize,
    },

    /// The room (or a room of the type) still has inhabitants.
    #[error("room {0} is occupied")]
    RoomIsOccupied(RoomId),

    /// The request already holds a room and reassignment is disabled.
    #[error("request {request} is already assigned to room {room}")]
    AlreadyAssigned { request: RequestId, room: RoomId },

    /// Malformed input or a cross-project reference.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AccommodationError {
    pub(crate) fn not_found(kind: EntityKind, id: u64) -> Self {
        Self::EntityNotFound { kind, id }
    }

    /// Whether the operation lost an optimistic-concurrency race and may
    /// succeed if retried from scratch.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_conflict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_entity() {
        let err = AccommodationError::not_found(EntityKind::Room, 12);
        assert_eq!(err.to_string(), "room 12 not found");
    }

    #[test]
    fn test_insufficient_space_message() {
        let err = AccommodationError::InsufficientRoomSpace {
            room: RoomId(3),
            free: 1,
            requested: 2,
        };
        assert!(err.to_string().contains("1 free place(s), 2 requested"));
    }

    #[test]
    fn test_is_conflict_only_for_storage_conflicts() {
        let conflict = AccommodationError::from(StorageError::Conflict {
            kind: EntityKind::Room,
            id: 1,
            expected: 0,
            actual: 1,
        });
        let unavailable =
            AccommodationError::from(StorageError::Unavailable("down".into()));

        assert!(conflict.is_conflict());
        assert!(!unavailable.is_conflict());
        assert!(!AccommodationError::RoomIsOccupied(RoomId(1)).is_conflict());
    }
}
