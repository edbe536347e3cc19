//! Unified error type for Billet.

use billet_access::AccessError;
use billet_notify::NotifyError;
use billet_room::AccommodationError;
use billet_store::StorageError;
use billet_types::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates `From` impls, so `?`
/// converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BilletError {
    /// An inventory or assignment operation was rejected or failed.
    #[error(transparent)]
    Accommodation(#[from] AccommodationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Access(#[from] AccessError),

    /// The notifier task failed or could not be stopped cleanly.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use billet_types::RoomId;

    #[test]
    fn test_from_accommodation_error() {
        let err = AccommodationError::RoomIsOccupied(RoomId(4));
        let billet_err: BilletError = err.into();
        assert!(matches!(billet_err, BilletError::Accommodation(_)));
        assert_eq!(billet_err.to_string(), "room R-4 is occupied");
    }

    #[test]
    fn test_from_storage_error() {
        let err = StorageError::Unavailable("maintenance".into());
        let billet_err: BilletError = err.into();
        assert!(matches!(billet_err, BilletError::Storage(_)));
        assert!(billet_err.to_string().contains("maintenance"));
    }

    #[test]
    fn test_from_access_error() {
        let err = AccessError::UnknownCapability("CanFly".into());
        let billet_err: BilletError = err.into();
        assert!(matches!(billet_err, BilletError::Access(_)));
    }

    #[test]
    fn test_from_notify_error() {
        let billet_err: BilletError = NotifyError::Closed.into();
        assert!(matches!(billet_err, BilletError::Notify(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidPayload("too big".into());
        let billet_err: BilletError = err.into();
        assert!(matches!(billet_err, BilletError::Protocol(_)));
    }
}
