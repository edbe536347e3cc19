//! A weekend festival: one lodge, a handful of parties, and a master
//! shuffling them around. Notifications are printed as they leave the
//! outbox.
//!
//! Set `BILLET_CONFIG` to a JSON file to override the defaults, and
//! `RUST_LOG` to change verbosity.

use billet::prelude::*;

const PROJECT: ProjectId = ProjectId(1);
const MASTER: UserId = UserId(1);
const HELPER: UserId = UserId(2);

async fn seed(
    store: &InMemoryStore,
) -> Result<Vec<AccommodationRequest>, BilletError> {
    store
        .insert_project(
            Project::new(PROJECT, "Lakeside Weekend")
                .with_acl(ProjectAcl::owner(MASTER, PROJECT))
                .with_acl(ProjectAcl::granting(
                    HELPER,
                    PROJECT,
                    [Capability::CanManageAccommodation],
                )),
        )
        .await;

    let parties: [&[(u64, &str)]; 3] = [
        &[(10, "Aelin"), (11, "Brannoc")],
        &[(12, "Cyrene"), (13, "Dorn"), (14, "Edda")],
        &[(15, "Fenwick")],
    ];
    let mut requests = Vec::new();
    for party in parties {
        let subjects = party
            .iter()
            .map(|(id, name)| Subject::new(UserId(*id), *name))
            .collect();
        requests.push(
            store
                .insert_request(AccommodationRequest::new(PROJECT, subjects))
                .await?,
        );
    }
    Ok(requests)
}

fn load_config() -> Result<BilletConfig, Box<dyn std::error::Error>> {
    match std::env::var("BILLET_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(BilletConfig::from_json(&json)?)
        }
        Err(_) => Ok(BilletConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("billet=info,festival=info");

    let store = Arc::new(InMemoryStore::new());
    let parties = seed(&store).await?;

    let (sink, mut outbox) = OutboxSink::channel(JsonCodec);
    let printer = tokio::spawn(async move {
        while let Some(bytes) = outbox.recv().await {
            match JsonCodec.decode::<NotificationEnvelope>(&bytes) {
                Ok(env) => {
                    let n = env.notification;
                    println!(
                        "#{} {:?} room {} ({}) by request {} -> notify {:?}",
                        env.seq,
                        n.change,
                        n.room_name,
                        n.room_id,
                        n.request_id,
                        n.recipients
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable outbox entry")
                }
            }
        }
    });

    let service = BilletServiceBuilder::new()
        .config(load_config()?)
        .build(Arc::clone(&store), sink);

    // The helper sets up the lodge.
    let lodge = service
        .inventory()
        .register_room_type(
            HELPER,
            RoomTypeDraft {
                project_id: PROJECT,
                name: "Lodge room".into(),
                cost: 40,
                capacity: 3,
                ..RoomTypeDraft::default()
            },
        )
        .await?;
    let rooms = service
        .inventory()
        .add_rooms(HELPER, PROJECT, lodge.id, "1-3, Attic")
        .await?;
    tracing::info!(count = rooms.len(), "lodge ready");

    let occupy = |room: &Room, request: &AccommodationRequest| OccupyRequest {
        project: PROJECT,
        room: room.id,
        request: request.id,
        actor: MASTER,
    };

    // The helper may not move players.
    let by_helper = OccupyRequest {
        actor: HELPER,
        ..occupy(&rooms[0], &parties[0])
    };
    if let Err(e) = service.occupy_room(by_helper).await {
        println!("helper rejected: {e}");
    }

    service.occupy_room(occupy(&rooms[0], &parties[0])).await?;
    service.occupy_room(occupy(&rooms[1], &parties[1])).await?;
    service.occupy_room(occupy(&rooms[0], &parties[2])).await?;

    // Room 2 is full; Fenwick can't follow the trio.
    match service.occupy_room(occupy(&rooms[1], &parties[2])).await {
        Err(BilletError::Accommodation(
            e @ AccommodationError::InsufficientRoomSpace { .. },
        )) => println!("as expected: {e}"),
        other => println!("unexpected: {other:?}"),
    }

    // Move the pair to the attic, then send Fenwick home.
    service.occupy_room(occupy(&rooms[3], &parties[0])).await?;
    service
        .unoccupy_room(UnoccupyRequest {
            project: PROJECT,
            request: parties[2].id,
            actor: MASTER,
        })
        .await?;

    for room in &rooms {
        let view = service.inventory().occupancy(PROJECT, room.id).await?;
        println!(
            "{:>6}: {} request(s), free {}",
            view.room.name,
            view.inhabitants.len(),
            view.free
        );
    }

    // Occupied rooms can't be deleted.
    let attic = rooms[3].id;
    if let Err(e) =
        service.inventory().delete_room(HELPER, attic, None, None).await
    {
        println!("delete rejected: {e}");
    }

    let stats = service.shutdown().await?;
    printer.await?;
    println!(
        "notifications: {} delivered, {} failed, {} dropped",
        stats.delivered, stats.failed, stats.dropped
    );
    Ok(())
}
