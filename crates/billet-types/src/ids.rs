//! Identity types for everything Billet stores or refers to.
//!
//! Every id is a newtype over `u64`. Two ids with the same number but a
//! different type are never equal at compile time: `RoomId(3)` and
//! `RequestId(3)` can't be mixed up in a function call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a `u64` newtype id with a display prefix.
///
/// `#[serde(transparent)]` keeps the JSON form a plain number, so
/// `RoomId(42)` serializes as `42` rather than `{"0":42}`.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord,
            Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(
    /// A project: one game/event organized on the platform.
    ProjectId,
    "PRJ"
);

id_type!(
    /// A platform user (player or master). Identity itself is managed
    /// elsewhere; Billet only ever sees the id.
    UserId,
    "U"
);

id_type!(
    /// A category of lodging offered by a project.
    RoomTypeId,
    "RT"
);

id_type!(
    /// A single bookable room.
    RoomId,
    "R"
);

id_type!(
    /// An accommodation request: a group of players who want to room together.
    RequestId,
    "AR"
);

/// The kind of entity an id refers to.
///
/// Carried by "not found" errors so callers can render a specific message
/// ("room R-4 not found") instead of a generic fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Project,
    RoomType,
    Room,
    AccommodationRequest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::RoomType => write!(f, "room type"),
            Self::Room => write!(f, "room"),
            Self::AccommodationRequest => write!(f, "accommodation request"),
        }
    }
}
