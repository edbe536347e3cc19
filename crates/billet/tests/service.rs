//! End-to-end tests through the `billet` facade: builder, inventory,
//! assignment, outbox, shutdown.

use billet::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

const PROJECT: ProjectId = ProjectId(7);
const MASTER: UserId = UserId(1);

fn pid(n: u64) -> UserId {
    UserId(n)
}

async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_project(
            Project::new(PROJECT, "Midsummer Court")
                .with_acl(ProjectAcl::owner(MASTER, PROJECT)),
        )
        .await;
    store
}

async fn party(store: &InMemoryStore, players: &[u64]) -> AccommodationRequest {
    store
        .insert_request(AccommodationRequest::new(
            PROJECT,
            players
                .iter()
                .map(|p| Subject::new(pid(*p), format!("player {p}")))
                .collect(),
        ))
        .await
        .unwrap()
}

async fn dormitory<S: Store>(service: &BilletService<S>, capacity: u32) -> RoomType {
    service
        .inventory()
        .register_room_type(
            MASTER,
            RoomTypeDraft {
                project_id: PROJECT,
                name: "Dormitory".into(),
                capacity,
                ..RoomTypeDraft::default()
            },
        )
        .await
        .unwrap()
}

// =========================================================================
// Full flow
// =========================================================================

#[tokio::test]
async fn test_occupy_and_vacate_reach_outbox() {
    let store = seeded_store().await;
    let (sink, mut outbox) = OutboxSink::channel(JsonCodec);
    let service = BilletServiceBuilder::new().build(Arc::clone(&store), sink);

    let room_type = dormitory(&service, 4).await;
    let rooms = service
        .inventory()
        .add_rooms(MASTER, PROJECT, room_type.id, "D1-D2, 1-2")
        .await
        .unwrap();
    let names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["D1-D2", "1", "2"]);

    let req = party(&store, &[10, 11]).await;
    let cmd = OccupyRequest {
        project: PROJECT,
        room: rooms[1].id,
        request: req.id,
        actor: MASTER,
    };
    let occupied = service.occupy_room(cmd).await.unwrap();
    assert_eq!(occupied.assigned_room(), Some(rooms[1].id));

    let vacated = service
        .unoccupy_room(UnoccupyRequest {
            project: PROJECT,
            request: req.id,
            actor: MASTER,
        })
        .await
        .unwrap();
    assert!(!vacated.is_assigned());

    let stats = service.shutdown().await.unwrap();
    assert_eq!(stats.delivered, 2);

    let mut envelopes = Vec::new();
    while let Ok(bytes) = outbox.try_recv() {
        let env: NotificationEnvelope = JsonCodec.decode(&bytes).unwrap();
        envelopes.push(env);
    }
    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0].seq, 1);
    assert_eq!(envelopes[0].notification.change, RoomChange::Occupied);
    assert_eq!(envelopes[1].notification.change, RoomChange::Vacated);
    assert_eq!(envelopes[1].notification.recipients, vec![pid(10), pid(11)]);
    assert_eq!(envelopes[1].notification.project_name, "Midsummer Court");
}

#[tokio::test]
async fn test_errors_convert_to_billet_error() {
    let store = seeded_store().await;
    let (sink, _outbox) = OutboxSink::channel(JsonCodec);
    let service = BilletServiceBuilder::new().build(Arc::clone(&store), sink);
    let room_type = dormitory(&service, 1).await;
    let rooms = service
        .inventory()
        .add_rooms(MASTER, PROJECT, room_type.id, "Cot")
        .await
        .unwrap();
    let pair = party(&store, &[1, 2]).await;

    let result = service
        .occupy_room(OccupyRequest {
            project: PROJECT,
            room: rooms[0].id,
            request: pair.id,
            actor: MASTER,
        })
        .await;

    assert!(matches!(
        result,
        Err(BilletError::Accommodation(
            AccommodationError::InsufficientRoomSpace { free: 1, requested: 2, .. }
        ))
    ));
    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_builder_applies_reassignment_policy() {
    let store = seeded_store().await;
    let (sink, _outbox) = OutboxSink::channel(JsonCodec);
    let service = BilletServiceBuilder::new()
        .reassignment(ReassignPolicy::RejectReassignment)
        .build(Arc::clone(&store), sink);
    let room_type = dormitory(&service, 2).await;
    let rooms = service
        .inventory()
        .add_rooms(MASTER, PROJECT, room_type.id, "A,B")
        .await
        .unwrap();
    let req = party(&store, &[1]).await;

    let occupy = |room: RoomId| OccupyRequest {
        project: PROJECT,
        room,
        request: req.id,
        actor: MASTER,
    };
    service.occupy_room(occupy(rooms[0].id)).await.unwrap();
    let result = service.occupy_room(occupy(rooms[1].id)).await;

    assert!(matches!(
        result,
        Err(BilletError::Accommodation(AccommodationError::AlreadyAssigned { .. }))
    ));
}

#[tokio::test]
async fn test_storage_outage_surfaces_and_changes_nothing() {
    let store = seeded_store().await;
    let (sink, _outbox) = OutboxSink::channel(JsonCodec);
    let service = BilletServiceBuilder::new().build(Arc::clone(&store), sink);
    let room_type = dormitory(&service, 2).await;
    let rooms = service
        .inventory()
        .add_rooms(MASTER, PROJECT, room_type.id, "A")
        .await
        .unwrap();
    let req = party(&store, &[1]).await;

    store.set_unavailable(true);
    let result = service
        .occupy_room(OccupyRequest {
            project: PROJECT,
            room: rooms[0].id,
            request: req.id,
            actor: MASTER,
        })
        .await;

    assert!(matches!(
        result,
        Err(BilletError::Accommodation(AccommodationError::Storage(
            StorageError::Unavailable(_)
        )))
    ));
    assert!(!store.request(req.id).await.unwrap().unwrap().is_assigned());
    assert_eq!(service.shutdown().await.unwrap().published, 0);
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn test_config_from_json_fills_defaults() {
    let config = BilletConfig::from_json(
        r#"{
            "accommodation": { "reassignment": "RejectReassignment" },
            "notifier": { "queue_capacity": 8 }
        }"#,
    )
    .unwrap();

    assert_eq!(
        config.accommodation.reassignment,
        ReassignPolicy::RejectReassignment
    );
    assert_eq!(config.accommodation.max_rooms_per_batch, 500);
    assert_eq!(config.notifier.queue_capacity, 8);
    assert_eq!(config.notifier.retry, RetryPolicy::default());
}

#[test]
fn test_config_from_bad_json_is_config_error() {
    let result = BilletConfig::from_json("{ not json");
    assert!(matches!(result, Err(BilletError::Config(_))));
}
