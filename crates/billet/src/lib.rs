//! # Billet
//!
//! Accommodation assignment and access control for live-action
//! role-playing events.
//!
//! Masters define room types and rooms per project, then move groups of
//! players (accommodation requests) into and out of rooms. Every change is
//! checked against the project's ACL and the room's capacity, committed
//! atomically, and announced to the people affected through a best-effort
//! notification channel.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billet::prelude::*;
//!
//! init_tracing("billet=info");
//!
//! let store = Arc::new(InMemoryStore::new());
//! let (sink, mut outbox) = OutboxSink::channel(JsonCodec);
//! let service = BilletServiceBuilder::new().build(Arc::clone(&store), sink);
//!
//! let rooms = service
//!     .inventory()
//!     .add_rooms(master, project, room_type, "101-110")
//!     .await?;
//! service
//!     .occupy_room(OccupyRequest { project, room: rooms[0].id, request, actor: master })
//!     .await?;
//!
//! service.shutdown().await?;
//! ```

mod error;
mod service;
mod telemetry;

pub use error::BilletError;
pub use service::{BilletConfig, BilletService, BilletServiceBuilder};
pub use telemetry::init_tracing;

pub use billet_access as access;
pub use billet_notify as notify;
pub use billet_room as room;
pub use billet_store as store;
pub use billet_types as types;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use billet::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::{
        BilletConfig, BilletError, BilletService, BilletServiceBuilder,
        init_tracing,
    };
    pub use billet_access::{
        AccessError, Capability, Project, ProjectAcl, has_capability,
        require_capability,
    };
    pub use billet_notify::{
        NotificationSink, NotifierConfig, NotifierStats, NotifyError,
        OutboxSink, RetryPolicy,
    };
    pub use billet_room::{
        AccommodationConfig, AccommodationError, FreeSpace, OccupyRequest,
        ReassignPolicy, RoomAssignment, RoomInventory, UnoccupyRequest,
    };
    pub use billet_store::{ChangeSet, InMemoryStore, StorageError, Store};
    pub use billet_types::{
        AccommodationRequest, Codec, EntityKind, JsonCodec,
        NotificationEnvelope, ProjectId, RequestId, Room, RoomChange, RoomId,
        RoomNotification, RoomType, RoomTypeDraft, RoomTypeId, Subject, UserId,
    };
}
