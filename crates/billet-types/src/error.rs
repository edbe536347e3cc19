//! Error types for encoding and decoding payloads.
//!
//! Each crate in Billet defines its own error enum, so a `ProtocolError`
//! always means "bytes went wrong", never "room is full".

/// Errors raised by a [`Codec`](crate::Codec).
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed input, missing fields, or a
    /// value of the wrong shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload decoded but is not acceptable.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
