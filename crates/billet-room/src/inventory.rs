//! Room inventory: room types and the rooms inside them.
//!
//! Every mutating method takes the acting user and requires
//! [`Capability::CanManageAccommodation`] in the target project. Reads are
//! unguarded; callers decide who may look.

use std::sync::Arc;

use billet_access::{Capability, Project, require_capability};
use billet_store::{ChangeSet, Committed, StorageError, Store};
use billet_types::{
    AccommodationRequest, EntityKind, ProjectId, Room, RoomId, RoomType,
    RoomTypeDraft, RoomTypeId, UserId,
};
use tracing::{debug, info, warn};

use crate::capacity::{self, FreeSpace};
use crate::names::{parse_room_names, rooms_from_names};
use crate::{AccommodationConfig, AccommodationError};

/// A room type together with its rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTypeDetails {
    pub room_type: RoomType,
    /// Ordered by id.
    pub rooms: Vec<Room>,
}

/// A room with everything needed to render its occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOccupancy {
    pub room: Room,
    pub room_type: RoomType,
    pub inhabitants: Vec<AccommodationRequest>,
    pub free: FreeSpace,
}

/// Creates, edits, and removes room types and rooms.
///
/// Cheap to clone; clones share the store.
#[derive(Debug)]
pub struct RoomInventory<S: Store> {
    store: Arc<S>,
    config: AccommodationConfig,
}

impl<S: Store> Clone for RoomInventory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> RoomInventory<S> {
    pub fn new(store: Arc<S>, config: AccommodationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AccommodationConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Room types
    // -----------------------------------------------------------------------

    /// Creates a room type when `draft.id` is `None`, otherwise overwrites
    /// every attribute of the existing one.
    ///
    /// # Errors
    /// - `InvalidArgument`: blank name, or the type belongs to another project
    /// - `EntityNotFound`: unknown project or room type
    /// - `Access`: actor lacks `CanManageAccommodation`
    pub async fn register_room_type(
        &self,
        actor: UserId,
        draft: RoomTypeDraft,
    ) -> Result<RoomType, AccommodationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(AccommodationError::InvalidArgument(
                "room type name must not be blank".into(),
            ));
        }
        let draft = RoomTypeDraft {
            name: name.to_string(),
            ..draft
        };

        let project = self.load_project(draft.project_id).await?;
        require_capability(actor, &project, Capability::CanManageAccommodation)?;

        let mut changes = ChangeSet::new();
        match draft.id {
            None => {
                changes.insert_room_type(RoomType::from_draft(draft));
            }
            Some(id) => {
                let mut existing = self.load_room_type(id).await?;
                if existing.project_id != project.id {
                    return Err(AccommodationError::InvalidArgument(format!(
                        "room type {id} does not belong to project {}",
                        project.id
                    )));
                }
                existing.apply(draft);
                changes.update_room_type(existing);
            }
        }

        let saved = self
            .commit(changes)
            .await?
            .room_types
            .pop()
            .ok_or_else(|| {
                StorageError::Integrity("commit returned no room type".into())
            })?;
        info!(
            project_id = %saved.project_id,
            room_type_id = %saved.id,
            name = %saved.name,
            "room type registered"
        );
        Ok(saved)
    }

    /// All room types of a project.
    pub async fn room_types(
        &self,
        project: ProjectId,
    ) -> Result<Vec<RoomType>, AccommodationError> {
        self.load_project(project).await?;
        Ok(self.store.room_types(project).await?)
    }

    /// A room type of `project` with its rooms.
    pub async fn room_type(
        &self,
        project: ProjectId,
        id: RoomTypeId,
    ) -> Result<RoomTypeDetails, AccommodationError> {
        let room_type = self.load_room_type(id).await?;
        if room_type.project_id != project {
            return Err(AccommodationError::not_found(EntityKind::RoomType, id.0));
        }
        let rooms = self.store.rooms_of_type(id).await?;
        Ok(RoomTypeDetails { room_type, rooms })
    }

    /// Removes a room type and all its rooms in one commit.
    ///
    /// # Errors
    /// - `EntityNotFound`: unknown project, or no such type in it
    /// - `Access`: actor lacks `CanManageAccommodation`
    /// - `RoomIsOccupied`: some room of the type has inhabitants (the
    ///   first such room, by id)
    pub async fn remove_room_type(
        &self,
        actor: UserId,
        project: ProjectId,
        room_type: RoomTypeId,
    ) -> Result<(), AccommodationError> {
        let project = self.load_project(project).await?;
        let room_type = self.load_room_type(room_type).await?;
        if room_type.project_id != project.id {
            return Err(AccommodationError::not_found(
                EntityKind::RoomType,
                room_type.id.0,
            ));
        }
        require_capability(actor, &project, Capability::CanManageAccommodation)?;

        let rooms = self.store.rooms_of_type(room_type.id).await?;
        for room in &rooms {
            if capacity::is_occupied(&self.store.inhabitants(room.id).await?) {
                debug!(
                    room_type_id = %room_type.id,
                    room_id = %room.id,
                    "room type removal rejected, room occupied"
                );
                return Err(AccommodationError::RoomIsOccupied(room.id));
            }
        }

        let mut changes = ChangeSet::new();
        for room in &rooms {
            changes.remove_room(room);
        }
        changes.remove_room_type(&room_type);
        self.commit(changes).await?;

        info!(
            project_id = %project.id,
            room_type_id = %room_type.id,
            rooms = rooms.len(),
            "room type removed"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// A room of `project`.
    pub async fn room(
        &self,
        project: ProjectId,
        id: RoomId,
    ) -> Result<Room, AccommodationError> {
        match self.store.room(id).await? {
            Some(room) if room.project_id == project => Ok(room),
            _ => Err(AccommodationError::not_found(EntityKind::Room, id.0)),
        }
    }

    /// A room of `project` with its type, inhabitants, and free space.
    pub async fn occupancy(
        &self,
        project: ProjectId,
        id: RoomId,
    ) -> Result<RoomOccupancy, AccommodationError> {
        let room = self.room(project, id).await?;
        let room_type = self.load_room_type(room.room_type_id).await?;
        let inhabitants = self.store.inhabitants(room.id).await?;
        let free = capacity::free_space(&room, &room_type, &inhabitants, None);
        Ok(RoomOccupancy {
            room,
            room_type,
            inhabitants,
            free,
        })
    }

    /// Creates rooms from a name spec such as `"101,102,201-203"`.
    ///
    /// All rooms are inserted in one commit; the returned rooms carry
    /// their new ids, in the order given.
    ///
    /// # Errors
    /// - `InvalidArgument`: empty spec, too many rooms, or the type
    ///   belongs to another project
    /// - `EntityNotFound`: unknown project or room type
    /// - `Access`: actor lacks `CanManageAccommodation`
    pub async fn add_rooms(
        &self,
        actor: UserId,
        project: ProjectId,
        room_type: RoomTypeId,
        spec: &str,
    ) -> Result<Vec<Room>, AccommodationError> {
        let project = self.load_project(project).await?;
        let room_type = self.load_room_type(room_type).await?;
        if room_type.project_id != project.id {
            return Err(AccommodationError::InvalidArgument(format!(
                "room type {} does not belong to project {}",
                room_type.id, project.id
            )));
        }
        require_capability(actor, &project, Capability::CanManageAccommodation)?;

        let names = parse_room_names(spec, self.config.max_rooms_per_batch)?;
        let mut changes = ChangeSet::new();
        for room in rooms_from_names(project.id, room_type.id, names) {
            changes.insert_room(room);
        }
        let rooms = self.commit(changes).await?.rooms;

        info!(
            project_id = %project.id,
            room_type_id = %room_type.id,
            count = rooms.len(),
            "rooms added"
        );
        Ok(rooms)
    }

    /// Renames a room.
    ///
    /// `project` and `room_type`, when given, must match the room's own;
    /// a mismatch is `InvalidArgument` and leaves the room untouched.
    pub async fn edit_room(
        &self,
        actor: UserId,
        room: RoomId,
        name: &str,
        project: Option<ProjectId>,
        room_type: Option<RoomTypeId>,
    ) -> Result<Room, AccommodationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccommodationError::InvalidArgument(
                "room name must not be blank".into(),
            ));
        }
        let (project, mut room) =
            self.load_room_for_edit(actor, room, project, room_type).await?;

        room.name = name.to_string();
        let mut changes = ChangeSet::new();
        changes.update_room(room);
        let room = self.commit(changes).await?.rooms.pop().ok_or_else(
            || StorageError::Integrity("commit returned no room".into()),
        )?;

        info!(
            project_id = %project.id,
            room_id = %room.id,
            name = %room.name,
            "room renamed"
        );
        Ok(room)
    }

    /// Deletes an empty room. Same cross-checks as [`edit_room`](Self::edit_room).
    ///
    /// # Errors
    /// `RoomIsOccupied` if any request lives in the room.
    pub async fn delete_room(
        &self,
        actor: UserId,
        room: RoomId,
        project: Option<ProjectId>,
        room_type: Option<RoomTypeId>,
    ) -> Result<(), AccommodationError> {
        let (project, room) =
            self.load_room_for_edit(actor, room, project, room_type).await?;

        if capacity::is_occupied(&self.store.inhabitants(room.id).await?) {
            debug!(room_id = %room.id, "room deletion rejected, room occupied");
            return Err(AccommodationError::RoomIsOccupied(room.id));
        }

        let mut changes = ChangeSet::new();
        changes.remove_room(&room);
        self.commit(changes).await?;

        info!(project_id = %project.id, room_id = %room.id, "room deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Loading and committing
    // -----------------------------------------------------------------------

    async fn commit(
        &self,
        changes: ChangeSet,
    ) -> Result<Committed, AccommodationError> {
        self.store.commit(changes).await.map_err(|e| {
            if e.is_conflict() {
                warn!(error = %e, "inventory change lost a race");
            }
            e.into()
        })
    }

    async fn load_project(
        &self,
        id: ProjectId,
    ) -> Result<Project, AccommodationError> {
        self.store
            .project(id)
            .await?
            .ok_or(AccommodationError::not_found(EntityKind::Project, id.0))
    }

    async fn load_room_type(
        &self,
        id: RoomTypeId,
    ) -> Result<RoomType, AccommodationError> {
        self.store
            .room_type(id)
            .await?
            .ok_or(AccommodationError::not_found(EntityKind::RoomType, id.0))
    }

    /// Loads a room, cross-checks the optional scope against it, then
    /// checks the actor's capability in the room's project.
    async fn load_room_for_edit(
        &self,
        actor: UserId,
        id: RoomId,
        project: Option<ProjectId>,
        room_type: Option<RoomTypeId>,
    ) -> Result<(Project, Room), AccommodationError> {
        let room = self
            .store
            .room(id)
            .await?
            .ok_or(AccommodationError::not_found(EntityKind::Room, id.0))?;

        if let Some(project) = project {
            if project != room.project_id {
                return Err(AccommodationError::InvalidArgument(format!(
                    "room {id} does not belong to project {project}"
                )));
            }
        }
        if let Some(room_type) = room_type {
            if room_type != room.room_type_id {
                return Err(AccommodationError::InvalidArgument(format!(
                    "room {id} is not of room type {room_type}"
                )));
            }
        }

        let project = self.load_project(room.project_id).await?;
        require_capability(actor, &project, Capability::CanManageAccommodation)?;
        Ok((project, room))
    }
}
