//! Where notifications end up.

use std::future::Future;

use billet_types::{Codec, NotificationEnvelope, ProtocolError};
use tokio::sync::mpsc;

use crate::NotifyError;

/// Receives envelopes from the notifier task.
///
/// Implementations return [`NotifyError::Delivery`] for failures worth
/// retrying; any other error makes the notifier give up on that envelope
/// immediately.
pub trait NotificationSink: Send + Sync + 'static {
    fn deliver(
        &self,
        envelope: &NotificationEnvelope,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Default upper bound on an encoded envelope, in bytes.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024;

/// A sink that encodes each envelope and appends the bytes to an outbox
/// channel. Whatever drains the receiving end (a mail gateway, a queue
/// writer) owns actual delivery.
#[derive(Debug, Clone)]
pub struct OutboxSink<C: Codec> {
    codec: C,
    outbox: mpsc::UnboundedSender<Vec<u8>>,
    max_payload: usize,
}

impl<C: Codec> OutboxSink<C> {
    pub fn new(codec: C, outbox: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self {
            codec,
            outbox,
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Creates a sink together with the receiving end of its outbox.
    pub fn channel(codec: C) -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(codec, tx), rx)
    }

    /// Rejects encoded envelopes larger than `bytes`.
    pub fn with_max_payload(mut self, bytes: usize) -> Self {
        self.max_payload = bytes;
        self
    }
}

impl<C: Codec> NotificationSink for OutboxSink<C> {
    async fn deliver(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<(), NotifyError> {
        let bytes = self.codec.encode(envelope)?;
        if bytes.len() > self.max_payload {
            return Err(ProtocolError::InvalidPayload(format!(
                "envelope {} is {} bytes, limit is {}",
                envelope.seq,
                bytes.len(),
                self.max_payload
            ))
            .into());
        }
        self.outbox.send(bytes).map_err(|_| NotifyError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billet_types::{
        JsonCodec, ProjectId, RequestId, RoomChange, RoomId, RoomNotification,
        UserId,
    };

    fn envelope(seq: u64) -> NotificationEnvelope {
        NotificationEnvelope {
            seq,
            timestamp: 0,
            notification: RoomNotification {
                change: RoomChange::Occupied,
                project_id: ProjectId(1),
                project_name: "Winter Ball".into(),
                room_id: RoomId(3),
                room_name: "101".into(),
                request_id: RequestId(7),
                initiator: UserId(1),
                recipients: vec![UserId(2)],
            },
        }
    }

    #[tokio::test]
    async fn test_outbox_receives_encoded_envelope() {
        let (sink, mut rx) = OutboxSink::channel(JsonCodec);

        sink.deliver(&envelope(1)).await.unwrap();

        let bytes = rx.recv().await.unwrap();
        let decoded: NotificationEnvelope = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, envelope(1));
    }

    #[tokio::test]
    async fn test_oversized_payload_is_rejected() {
        let (sink, mut rx) = OutboxSink::channel(JsonCodec);
        let sink = sink.with_max_payload(16);

        let result = sink.deliver(&envelope(1)).await;

        assert!(matches!(
            result,
            Err(NotifyError::Codec(ProtocolError::InvalidPayload(_)))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_outbox_is_closed_error() {
        let (sink, rx) = OutboxSink::channel(JsonCodec);
        drop(rx);

        let result = sink.deliver(&envelope(1)).await;

        assert!(matches!(result, Err(NotifyError::Closed)));
    }
}
