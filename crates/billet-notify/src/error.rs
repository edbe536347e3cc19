use billet_types::ProtocolError;

/// Errors from publishing or delivering notifications.
///
/// None of these ever reach the caller of an accommodation operation;
/// the notifier logs them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The queue is at capacity; the notification was dropped.
    #[error("notification queue is full")]
    QueueFull,

    /// The notifier task has stopped, or the sink's downstream is gone.
    #[error("notification channel closed")]
    Closed,

    /// The notification could not be encoded for the sink.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// The sink failed to deliver; worth another attempt.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The notifier task panicked or was aborted.
    #[error("notifier task failed: {0}")]
    Task(String),
}

impl NotifyError {
    /// Whether retrying the same delivery could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}
