//! Shared fixture: an in-memory store with two projects, an inventory,
//! an assignment engine, and a sink that records every notification.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use billet_access::{Capability, Project, ProjectAcl};
use billet_notify::{
    NotificationSink, NotifierConfig, NotifierTask, NotifyError,
    spawn_notifier,
};
use billet_room::{
    AccommodationConfig, OccupyRequest, RoomAssignment, RoomInventory,
    UnoccupyRequest,
};
use billet_store::{InMemoryStore, Store};
use billet_types::{
    AccommodationRequest, NotificationEnvelope, ProjectId, RequestId, Room,
    RoomNotification, RoomType, RoomTypeDraft, Subject, UserId,
};

pub const PROJECT: ProjectId = ProjectId(1);
pub const OTHER_PROJECT: ProjectId = ProjectId(2);

/// Holds both accommodation capabilities in `PROJECT`.
pub const MASTER: UserId = UserId(100);
/// Can edit the inventory but not move players.
pub const HOUSEKEEPER: UserId = UserId(101);
/// Can move players but not edit the inventory.
pub const SETTLER: UserId = UserId(102);
/// No ACL entry at all.
pub const OUTSIDER: UserId = UserId(103);

pub fn uid(n: u64) -> UserId {
    UserId(n)
}

#[derive(Clone, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<NotificationEnvelope>>>);

impl NotificationSink for RecordingSink {
    async fn deliver(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<(), NotifyError> {
        self.0.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub inventory: RoomInventory<InMemoryStore>,
    pub assignment: RoomAssignment<InMemoryStore>,
    sink: RecordingSink,
    task: NotifierTask,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(AccommodationConfig::default()).await
    }

    pub async fn with_config(config: AccommodationConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_project(
                Project::new(PROJECT, "Winter Ball")
                    .with_acl(ProjectAcl::granting(
                        MASTER,
                        PROJECT,
                        [
                            Capability::CanManageAccommodation,
                            Capability::CanSetPlayersAccommodations,
                        ],
                    ))
                    .with_acl(ProjectAcl::granting(
                        HOUSEKEEPER,
                        PROJECT,
                        [Capability::CanManageAccommodation],
                    ))
                    .with_acl(ProjectAcl::granting(
                        SETTLER,
                        PROJECT,
                        [Capability::CanSetPlayersAccommodations],
                    )),
            )
            .await;
        store
            .insert_project(
                Project::new(OTHER_PROJECT, "Summer Siege")
                    .with_acl(ProjectAcl::owner(MASTER, OTHER_PROJECT)),
            )
            .await;

        let sink = RecordingSink::default();
        let (notifier, task) =
            spawn_notifier(sink.clone(), NotifierConfig::default());

        Self {
            inventory: RoomInventory::new(Arc::clone(&store), config.clone()),
            assignment: RoomAssignment::new(Arc::clone(&store), notifier, config),
            store,
            sink,
            task,
        }
    }

    pub async fn room_type_in(
        &self,
        project: ProjectId,
        capacity: u32,
        infinite: bool,
    ) -> RoomType {
        self.inventory
            .register_room_type(
                MASTER,
                RoomTypeDraft {
                    project_id: project,
                    name: format!("Type for {capacity}"),
                    capacity,
                    is_infinite: infinite,
                    ..RoomTypeDraft::default()
                },
            )
            .await
            .unwrap()
    }

    pub async fn room_type(&self, capacity: u32) -> RoomType {
        self.room_type_in(PROJECT, capacity, false).await
    }

    pub async fn rooms(&self, room_type: &RoomType, spec: &str) -> Vec<Room> {
        self.inventory
            .add_rooms(MASTER, room_type.project_id, room_type.id, spec)
            .await
            .unwrap()
    }

    /// One room of the given capacity in `PROJECT`.
    pub async fn room(&self, capacity: u32) -> Room {
        let room_type = self.room_type(capacity).await;
        self.rooms(&room_type, "Solo").await.remove(0)
    }

    /// An unassigned request in `project`, one subject per player.
    pub async fn request_in(
        &self,
        project: ProjectId,
        players: &[u64],
    ) -> AccommodationRequest {
        let subjects = players
            .iter()
            .map(|p| Subject::new(uid(*p), format!("player {p}")))
            .collect();
        self.store
            .insert_request(AccommodationRequest::new(project, subjects))
            .await
            .unwrap()
    }

    pub async fn request(&self, players: &[u64]) -> AccommodationRequest {
        self.request_in(PROJECT, players).await
    }

    pub async fn stored_request(&self, id: RequestId) -> AccommodationRequest {
        self.store.request(id).await.unwrap().unwrap()
    }

    /// Stops the notifier and returns everything it delivered.
    pub async fn notifications(self) -> Vec<RoomNotification> {
        self.task.shutdown().await.unwrap();
        let delivered = self.sink.0.lock().unwrap().clone();
        delivered.into_iter().map(|e| e.notification).collect()
    }
}

pub fn occupy(room: &Room, request: &AccommodationRequest) -> OccupyRequest {
    OccupyRequest {
        project: PROJECT,
        room: room.id,
        request: request.id,
        actor: MASTER,
    }
}

pub fn unoccupy(request: &AccommodationRequest) -> UnoccupyRequest {
    UnoccupyRequest {
        project: PROJECT,
        request: request.id,
        actor: MASTER,
    }
}
