//! In-memory [`Store`] adapter.
//!
//! All tables live behind one `tokio::sync::RwLock`. A commit takes the
//! write lock, applies the change set to a staged copy, and only swaps the
//! copy in if every change validated. Readers never see half a commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use billet_access::Project;
use billet_types::{
    AccommodationRequest, EntityKind, ProjectId, RequestId, Room, RoomId,
    RoomType, RoomTypeId,
};
use tokio::sync::RwLock;

use crate::{Change, ChangeSet, Committed, StorageError, Store};

/// A [`Store`] that keeps everything in process memory.
///
/// Ids are allocated per table starting at 1. Besides the [`Store`]
/// methods it offers seeding helpers for records that the accommodation
/// core never creates itself (projects, accommodation requests), plus an
/// outage switch for exercising storage failures.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    projects: HashMap<ProjectId, Project>,
    room_types: BTreeMap<RoomTypeId, RoomType>,
    rooms: BTreeMap<RoomId, Room>,
    requests: BTreeMap<RequestId, AccommodationRequest>,
    last_room_type_id: u64,
    last_room_id: u64,
    last_request_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a project (with its ACL).
    pub async fn insert_project(&self, project: Project) {
        let mut tables = self.tables.write().await;
        tables.projects.insert(project.id, project);
    }

    /// Inserts an accommodation request, as the claim flow would.
    ///
    /// The request may already be assigned; the room must exist in the
    /// same project. Returns the request with its assigned id.
    pub async fn insert_request(
        &self,
        mut request: AccommodationRequest,
    ) -> Result<AccommodationRequest, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&request.project_id) {
            return Err(StorageError::Integrity(format!(
                "request references unknown project {}",
                request.project_id
            )));
        }
        tables.check_request_room(&request)?;

        tables.last_request_id += 1;
        request.id = RequestId(tables.last_request_id);
        request.version = 0;
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    /// Simulates an outage: while set, every commit fails with
    /// [`StorageError::Unavailable`]. Reads keep working.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Store for InMemoryStore {
    async fn project(
        &self,
        id: ProjectId,
    ) -> Result<Option<Project>, StorageError> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn room_type(
        &self,
        id: RoomTypeId,
    ) -> Result<Option<RoomType>, StorageError> {
        Ok(self.tables.read().await.room_types.get(&id).cloned())
    }

    async fn room_types(
        &self,
        project: ProjectId,
    ) -> Result<Vec<RoomType>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .room_types
            .values()
            .filter(|rt| rt.project_id == project)
            .cloned()
            .collect())
    }

    async fn room(&self, id: RoomId) -> Result<Option<Room>, StorageError> {
        Ok(self.tables.read().await.rooms.get(&id).cloned())
    }

    async fn rooms_of_type(
        &self,
        room_type: RoomTypeId,
    ) -> Result<Vec<Room>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rooms
            .values()
            .filter(|r| r.room_type_id == room_type)
            .cloned()
            .collect())
    }

    async fn request(
        &self,
        id: RequestId,
    ) -> Result<Option<AccommodationRequest>, StorageError> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn inhabitants(
        &self,
        room: RoomId,
    ) -> Result<Vec<AccommodationRequest>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .filter(|r| r.assigned_room() == Some(room))
            .cloned()
            .collect())
    }

    async fn commit(
        &self,
        changes: ChangeSet,
    ) -> Result<Committed, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store is switched off".into(),
            ));
        }

        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        let mut committed = Committed::default();
        let count = changes.len();

        for change in changes {
            staged.apply(change, &mut committed)?;
        }

        *tables = staged;
        tracing::trace!(changes = count, "commit applied");
        Ok(committed)
    }
}

// ---------------------------------------------------------------------------
// Change application
// ---------------------------------------------------------------------------

/// Checks an expected version against the stored one.
fn check_version(
    kind: EntityKind,
    id: u64,
    expected: u64,
    actual: u64,
) -> Result<(), StorageError> {
    if expected != actual {
        tracing::warn!(%kind, id, expected, actual, "version conflict");
        return Err(StorageError::Conflict {
            kind,
            id,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Tables {
    fn apply(
        &mut self,
        change: Change,
        committed: &mut Committed,
    ) -> Result<(), StorageError> {
        match change {
            Change::InsertRoomType(mut room_type) => {
                if !self.projects.contains_key(&room_type.project_id) {
                    return Err(StorageError::Integrity(format!(
                        "room type references unknown project {}",
                        room_type.project_id
                    )));
                }
                self.last_room_type_id += 1;
                room_type.id = RoomTypeId(self.last_room_type_id);
                room_type.version = 0;
                self.room_types.insert(room_type.id, room_type.clone());
                committed.room_types.push(room_type);
            }

            Change::UpdateRoomType(mut room_type) => {
                let stored = self.room_types.get(&room_type.id).ok_or(
                    StorageError::Missing {
                        kind: EntityKind::RoomType,
                        id: room_type.id.0,
                    },
                )?;
                check_version(
                    EntityKind::RoomType,
                    room_type.id.0,
                    room_type.version,
                    stored.version,
                )?;
                if stored.project_id != room_type.project_id {
                    return Err(StorageError::Integrity(format!(
                        "room type {} cannot move between projects",
                        room_type.id
                    )));
                }
                room_type.version += 1;
                self.room_types.insert(room_type.id, room_type.clone());
                committed.room_types.push(room_type);
            }

            Change::RemoveRoomType { id, version } => {
                let stored = self.room_types.get(&id).ok_or(
                    StorageError::Missing {
                        kind: EntityKind::RoomType,
                        id: id.0,
                    },
                )?;
                check_version(EntityKind::RoomType, id.0, version, stored.version)?;
                if self.rooms.values().any(|r| r.room_type_id == id) {
                    return Err(StorageError::Integrity(format!(
                        "room type {id} still has rooms"
                    )));
                }
                self.room_types.remove(&id);
            }

            Change::InsertRoom(mut room) => {
                self.check_room_type(&room)?;
                self.last_room_id += 1;
                room.id = RoomId(self.last_room_id);
                room.version = 0;
                self.rooms.insert(room.id, room.clone());
                committed.rooms.push(room);
            }

            Change::UpdateRoom(mut room) => {
                let stored =
                    self.rooms.get(&room.id).ok_or(StorageError::Missing {
                        kind: EntityKind::Room,
                        id: room.id.0,
                    })?;
                check_version(
                    EntityKind::Room,
                    room.id.0,
                    room.version,
                    stored.version,
                )?;
                self.check_room_type(&room)?;
                room.version += 1;
                self.rooms.insert(room.id, room.clone());
                committed.rooms.push(room);
            }

            Change::RemoveRoom { id, version } => {
                let stored = self.rooms.get(&id).ok_or(StorageError::Missing {
                    kind: EntityKind::Room,
                    id: id.0,
                })?;
                check_version(EntityKind::Room, id.0, version, stored.version)?;
                if self
                    .requests
                    .values()
                    .any(|r| r.assigned_room() == Some(id))
                {
                    return Err(StorageError::Integrity(format!(
                        "room {id} still has inhabitants"
                    )));
                }
                self.rooms.remove(&id);
            }

            Change::UpdateRequest(mut request) => {
                let stored = self.requests.get(&request.id).ok_or(
                    StorageError::Missing {
                        kind: EntityKind::AccommodationRequest,
                        id: request.id.0,
                    },
                )?;
                check_version(
                    EntityKind::AccommodationRequest,
                    request.id.0,
                    request.version,
                    stored.version,
                )?;
                self.check_request_room(&request)?;
                request.version += 1;
                self.requests.insert(request.id, request.clone());
                committed.requests.push(request);
            }

            Change::TouchRoom { id, version } => {
                let stored =
                    self.rooms.get_mut(&id).ok_or(StorageError::Missing {
                        kind: EntityKind::Room,
                        id: id.0,
                    })?;
                check_version(EntityKind::Room, id.0, version, stored.version)?;
                stored.version += 1;
            }
        }
        Ok(())
    }

    /// The room's type must exist and belong to the room's project.
    fn check_room_type(&self, room: &Room) -> Result<(), StorageError> {
        match self.room_types.get(&room.room_type_id) {
            Some(rt) if rt.project_id == room.project_id => Ok(()),
            Some(_) => Err(StorageError::Integrity(format!(
                "room {} and its type {} belong to different projects",
                room.id, room.room_type_id
            ))),
            None => Err(StorageError::Integrity(format!(
                "room {} references unknown room type {}",
                room.id, room.room_type_id
            ))),
        }
    }

    /// An assigned request must point at an existing room of its project.
    fn check_request_room(
        &self,
        request: &AccommodationRequest,
    ) -> Result<(), StorageError> {
        let Some(room_id) = request.assigned_room() else {
            return Ok(());
        };
        match self.rooms.get(&room_id) {
            Some(room) if room.project_id == request.project_id => Ok(()),
            Some(_) => Err(StorageError::Integrity(format!(
                "request {} assigned to room {room_id} of another project",
                request.id
            ))),
            None => Err(StorageError::Integrity(format!(
                "request {} assigned to unknown room {room_id}",
                request.id
            ))),
        }
    }
}
