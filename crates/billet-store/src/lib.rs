//! Storage abstraction for Billet.
//!
//! Provides the [`Store`] trait the accommodation core loads and persists
//! through, and the [`ChangeSet`] unit of work it commits.
//!
//! Every operation in the core follows the same shape: load what it needs,
//! validate, build a `ChangeSet`, and commit it in one call. A commit is
//! all-or-nothing. Updates carry the version the caller read; if someone
//! else committed in between, the store answers with
//! [`StorageError::Conflict`] instead of silently overwriting.
//!
//! # Feature Flags
//!
//! - `memory` (default): [`InMemoryStore`], a `tokio::sync::RwLock`-backed
//!   adapter used by tests and demos

mod changes;
mod error;
#[cfg(feature = "memory")]
mod memory;

pub use changes::{Change, ChangeSet, Committed};
pub use error::StorageError;
#[cfg(feature = "memory")]
pub use memory::InMemoryStore;

use std::future::Future;

use billet_access::Project;
use billet_types::{
    AccommodationRequest, ProjectId, RequestId, Room, RoomId, RoomType,
    RoomTypeId,
};

/// Loads and persists lodging records.
///
/// Lookups return `Ok(None)` for a missing record; `Err` is reserved for
/// the store itself failing. Loaded records are snapshots: changing them
/// does nothing until they go back through [`commit`](Self::commit).
///
/// # Example
///
/// ```rust,ignore
/// use billet_store::{ChangeSet, InMemoryStore, Store};
/// use billet_access::Project;
/// use billet_types::{ProjectId, RoomType, RoomTypeDraft};
///
/// let store = InMemoryStore::new();
/// store.insert_project(Project::new(ProjectId(1), "Winter Ball")).await;
///
/// let mut changes = ChangeSet::new();
/// changes.insert_room_type(RoomType::from_draft(RoomTypeDraft {
///     project_id: ProjectId(1),
///     name: "Dorm".into(),
///     capacity: 4,
///     ..RoomTypeDraft::default()
/// }));
/// let committed = store.commit(changes).await?;
///
/// let id = committed.room_types[0].id;
/// assert_eq!(store.room_type(id).await?.unwrap().name, "Dorm");
/// ```
pub trait Store: Send + Sync + 'static {
    /// A project with its ACL entries loaded.
    fn project(
        &self,
        id: ProjectId,
    ) -> impl Future<Output = Result<Option<Project>, StorageError>> + Send;

    fn room_type(
        &self,
        id: RoomTypeId,
    ) -> impl Future<Output = Result<Option<RoomType>, StorageError>> + Send;

    /// All room types of a project, ordered by id.
    fn room_types(
        &self,
        project: ProjectId,
    ) -> impl Future<Output = Result<Vec<RoomType>, StorageError>> + Send;

    fn room(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<Room>, StorageError>> + Send;

    /// All rooms of a type, ordered by id.
    fn rooms_of_type(
        &self,
        room_type: RoomTypeId,
    ) -> impl Future<Output = Result<Vec<Room>, StorageError>> + Send;

    fn request(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<AccommodationRequest>, StorageError>>
    + Send;

    /// Requests currently assigned to `room`, ordered by id.
    fn inhabitants(
        &self,
        room: RoomId,
    ) -> impl Future<Output = Result<Vec<AccommodationRequest>, StorageError>>
    + Send;

    /// Applies every change in `changes` atomically.
    ///
    /// # Errors
    /// - [`StorageError::Conflict`]: a record changed since it was read
    /// - [`StorageError::Missing`]: an update/remove targets nothing
    /// - [`StorageError::Integrity`]: a reference would dangle
    /// - [`StorageError::Unavailable`]: the backend can't be reached
    ///
    /// On error nothing is applied.
    fn commit(
        &self,
        changes: ChangeSet,
    ) -> impl Future<Output = Result<Committed, StorageError>> + Send;
}
