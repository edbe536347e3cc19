use billet_types::EntityKind;

/// Errors that can occur while loading or committing.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The record changed since the caller loaded it.
    #[error("{kind} {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        kind: EntityKind,
        id: u64,
        expected: u64,
        actual: u64,
    },

    /// An update or removal targets a record that doesn't exist.
    #[error("{kind} {id} does not exist")]
    Missing { kind: EntityKind, id: u64 },

    /// The change would leave a dangling or cross-project reference.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The backend can't be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Returns `true` for optimistic-concurrency failures, which a caller
    /// may resolve by reloading and trying again.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
