//! Accommodation core for Billet.
//!
//! # Key types
//!
//! - [`RoomAssignment`]: occupies and vacates rooms, with capacity checks
//!   and post-commit notifications
//! - [`RoomInventory`]: room types and rooms: register, add by name spec,
//!   rename, delete
//! - [`FreeSpace`] and the [`capacity`] functions: pure capacity math
//! - [`names`]: the `"101,102,201-203"` room name parser
//! - [`AccommodationConfig`]: reassignment policy and batch limits
//!
//! All operations work against any [`Store`](billet_store::Store) and
//! commit each change as a single atomic change set.

mod assignment;
pub mod capacity;
mod config;
mod error;
mod inventory;
pub mod names;

pub use assignment::{OccupyRequest, RoomAssignment, UnoccupyRequest};
pub use capacity::FreeSpace;
pub use config::{AccommodationConfig, ReassignPolicy};
pub use error::AccommodationError;
pub use inventory::{RoomInventory, RoomOccupancy, RoomTypeDetails};
