//! The assignment engine: moving accommodation requests into and out of
//! rooms.
//!
//! A request is either unassigned or assigned to exactly one room. Both
//! operations follow the same shape:
//!
//! ```text
//! load (project, room, request) → require capability → validate
//!     → commit (request + room version bump) → publish notification
//! ```
//!
//! The room version bump is what keeps two masters from filling the last
//! place at the same time: each computed free space against the version
//! it loaded, so only the first commit gets through and the second one
//! fails with a storage conflict.

use std::collections::BTreeSet;
use std::sync::Arc;

use billet_access::{Capability, Project, require_capability};
use billet_notify::Notifier;
use billet_store::{ChangeSet, StorageError, Store};
use billet_types::{
    AccommodationRequest, EntityKind, ProjectId, RequestId, Room, RoomChange,
    RoomId, RoomNotification, RoomType, UserId,
};
use tracing::{debug, info, warn};

use crate::capacity::free_space;
use crate::{AccommodationConfig, AccommodationError, ReassignPolicy};

/// Put `request` into `room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupyRequest {
    pub project: ProjectId,
    pub room: RoomId,
    pub request: RequestId,
    /// The master performing the change.
    pub actor: UserId,
}

/// Take `request` out of whatever room it is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnoccupyRequest {
    pub project: ProjectId,
    pub request: RequestId,
    pub actor: UserId,
}

/// Occupies and vacates rooms.
#[derive(Debug)]
pub struct RoomAssignment<S: Store> {
    store: Arc<S>,
    notifier: Notifier,
    config: AccommodationConfig,
}

impl<S: Store> Clone for RoomAssignment<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// A room with its type and current inhabitants.
struct LoadedRoom {
    room: Room,
    room_type: RoomType,
    inhabitants: Vec<AccommodationRequest>,
}

impl<S: Store> RoomAssignment<S> {
    pub fn new(
        store: Arc<S>,
        notifier: Notifier,
        config: AccommodationConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Assigns a request to a room and returns the updated request.
    ///
    /// Occupying the room the request already holds succeeds without
    /// writing anything. If the request holds another room, the
    /// configured [`ReassignPolicy`] decides between moving it and
    /// failing with `AlreadyAssigned`.
    ///
    /// # Errors
    /// - `EntityNotFound`: project, room, or request missing (or in
    ///   another project)
    /// - `Access`: actor lacks `CanSetPlayersAccommodations`
    /// - `AlreadyAssigned`: request holds another room and reassignment
    ///   is rejected
    /// - `InsufficientRoomSpace`: the request's subjects don't fit
    /// - `Storage`: commit failed; nothing was applied
    pub async fn occupy_room(
        &self,
        cmd: OccupyRequest,
    ) -> Result<AccommodationRequest, AccommodationError> {
        let project = self.load_project(cmd.project).await?;
        let target = self.load_room(project.id, cmd.room).await?;
        let request = self.load_request(project.id, cmd.request).await?;
        require_capability(
            cmd.actor,
            &project,
            Capability::CanSetPlayersAccommodations,
        )?;

        let previous = request.assigned_room();
        if previous == Some(target.room.id) {
            debug!(
                request_id = %request.id,
                room_id = %target.room.id,
                "request already in room, nothing to do"
            );
            return Ok(request);
        }
        if let (Some(room), ReassignPolicy::RejectReassignment) =
            (previous, self.config.reassignment)
        {
            debug!(
                request_id = %request.id,
                %room,
                "occupy rejected, request already assigned"
            );
            return Err(AccommodationError::AlreadyAssigned {
                request: request.id,
                room,
            });
        }

        let requested = request.occupant_count();
        let free = free_space(
            &target.room,
            &target.room_type,
            &target.inhabitants,
            Some(request.id),
        );
        if !free.fits(requested) {
            debug!(
                request_id = %request.id,
                room_id = %target.room.id,
                %free,
                requested,
                "occupy rejected, not enough space"
            );
            return Err(AccommodationError::InsufficientRoomSpace {
                room: target.room.id,
                free: free.limited().unwrap_or_default(),
                requested,
            });
        }

        let left = match previous {
            Some(id) => Some(self.load_room(project.id, id).await?),
            None => None,
        };

        let mut updated = request;
        updated.assign_to(target.room.id);
        let mut changes = ChangeSet::new();
        changes.update_request(updated).touch_room(&target.room);
        if let Some(left) = &left {
            changes.touch_room(&left.room);
        }
        let updated = self.commit_request(changes).await?;

        info!(
            project_id = %project.id,
            request_id = %updated.id,
            room_id = %target.room.id,
            from_room = ?previous,
            actor = %cmd.actor,
            "room occupied"
        );

        if let Some(left) = &left {
            self.publish(RoomChange::Vacated, &project, left, &updated, cmd.actor);
        }
        self.publish(
            RoomChange::Occupied,
            &project,
            &target,
            &updated,
            cmd.actor,
        );
        Ok(updated)
    }

    /// Removes a request from its room and returns the updated request.
    ///
    /// An unassigned request is returned as is, without writing anything.
    ///
    /// # Errors
    /// - `EntityNotFound`: project or request missing
    /// - `Access`: actor lacks `CanSetPlayersAccommodations`
    /// - `Storage`: commit failed; nothing was applied
    pub async fn unoccupy_room(
        &self,
        cmd: UnoccupyRequest,
    ) -> Result<AccommodationRequest, AccommodationError> {
        let project = self.load_project(cmd.project).await?;
        let request = self.load_request(project.id, cmd.request).await?;
        let current = match request.assigned_room() {
            Some(id) => Some(self.load_room(project.id, id).await?),
            None => None,
        };
        require_capability(
            cmd.actor,
            &project,
            Capability::CanSetPlayersAccommodations,
        )?;

        let Some(current) = current else {
            debug!(
                request_id = %request.id,
                "request not assigned, nothing to do"
            );
            return Ok(request);
        };

        let mut updated = request;
        updated.vacate();
        let mut changes = ChangeSet::new();
        changes.update_request(updated).touch_room(&current.room);
        let updated = self.commit_request(changes).await?;

        info!(
            project_id = %project.id,
            request_id = %updated.id,
            room_id = %current.room.id,
            actor = %cmd.actor,
            "room vacated"
        );

        self.publish(
            RoomChange::Vacated,
            &project,
            &current,
            &updated,
            cmd.actor,
        );
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn commit_request(
        &self,
        changes: ChangeSet,
    ) -> Result<AccommodationRequest, AccommodationError> {
        let committed = self.store.commit(changes).await.map_err(|e| {
            if e.is_conflict() {
                warn!(error = %e, "assignment lost a race, nothing applied");
            }
            AccommodationError::from(e)
        })?;
        committed.requests.into_iter().next().ok_or_else(|| {
            StorageError::Integrity("commit returned no request".into()).into()
        })
    }

    /// Hands a notification to the notifier. Failures are logged there and
    /// never fail the operation.
    fn publish(
        &self,
        change: RoomChange,
        project: &Project,
        room: &LoadedRoom,
        request: &AccommodationRequest,
        initiator: UserId,
    ) {
        let notification = RoomNotification {
            change,
            project_id: project.id,
            project_name: project.name.clone(),
            room_id: room.room.id,
            room_name: room.room.name.clone(),
            request_id: request.id,
            initiator,
            recipients: recipients(&room.inhabitants, request),
        };
        if let Err(e) = self.notifier.publish(notification) {
            debug!(
                error = %e,
                room_id = %room.room.id,
                "notification not queued"
            );
        }
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

    /// Loads a room of `project` with its type and inhabitants.
    async fn load_room(
        &self,
        project: ProjectId,
        id: RoomId,
    ) -> Result<LoadedRoom, AccommodationError> {
        let room = match self.store.room(id).await? {
            Some(room) if room.project_id == project => room,
            _ => {
                return Err(AccommodationError::not_found(EntityKind::Room, id.0));
            }
        };
        let room_type = self
            .store
            .room_type(room.room_type_id)
            .await?
            .ok_or(AccommodationError::not_found(
                EntityKind::RoomType,
                room.room_type_id.0,
            ))?;
        let inhabitants = self.store.inhabitants(room.id).await?;
        Ok(LoadedRoom {
            room,
            room_type,
            inhabitants,
        })
    }

    async fn load_request(
        &self,
        project: ProjectId,
        id: RequestId,
    ) -> Result<AccommodationRequest, AccommodationError> {
        match self.store.request(id).await? {
            Some(request) if request.project_id == project => Ok(request),
            _ => Err(AccommodationError::not_found(
                EntityKind::AccommodationRequest,
                id.0,
            )),
        }
    }
}

/// Players of everyone in the room plus the players of the changed
/// request. Sorted, no duplicates.
fn recipients(
    inhabitants: &[AccommodationRequest],
    request: &AccommodationRequest,
) -> Vec<UserId> {
    inhabitants
        .iter()
        .flat_map(|r| r.players())
        .chain(request.players())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
