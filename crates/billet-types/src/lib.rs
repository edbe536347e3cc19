//! Shared vocabulary for Billet.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identifiers** ([`ProjectId`], [`RoomId`], [`RequestId`], ...):
//!   newtype wrappers so a room id can never be passed where a request id
//!   is expected.
//! - **Lodging entities** ([`RoomType`], [`Room`], [`AccommodationRequest`],
//!   [`Subject`]): the records the store persists and the engine mutates.
//! - **Notifications** ([`RoomNotification`], [`NotificationEnvelope`]):
//!   what gets handed to the outbound notification channel after a commit.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how notifications are
//!   turned into bytes for an outbox.
//!
//! # Architecture
//!
//! ```text
//! access (ACL) → store (persistence) → room (capacity, inventory, assignment)
//!                      ↑                         │
//!                 types (this crate)        notify (outbox)
//! ```

mod codec;
mod error;
mod ids;
mod lodging;
mod notification;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use ids::{EntityKind, ProjectId, RequestId, RoomId, RoomTypeId, UserId};
pub use lodging::{AccommodationRequest, Room, RoomType, RoomTypeDraft, Subject};
pub use notification::{NotificationEnvelope, RoomChange, RoomNotification};
