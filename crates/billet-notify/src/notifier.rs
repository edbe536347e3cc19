//! The notifier: a cloneable publish handle plus one background task that
//! drains a bounded queue into a [`NotificationSink`].
//!
//! Publishing never waits. A full queue drops the notification with a
//! warning; a failing sink is retried per [`RetryPolicy`](crate::RetryPolicy)
//! and then given up on. Either way the caller's operation has already
//! committed and is not affected.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use billet_types::{NotificationEnvelope, RoomNotification};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

use crate::{NotificationSink, NotifierConfig, NotifyError, RetryPolicy};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Counters {
    published: AtomicU64,
    dropped: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    retries: AtomicU64,
}

/// Point-in-time copy of the notifier's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifierStats {
    /// Accepted into the queue.
    pub published: u64,
    /// Rejected at publish time (queue full or notifier stopped).
    pub dropped: u64,
    /// Handed to the sink successfully.
    pub delivered: u64,
    /// Given up on after the last attempt.
    pub failed: u64,
    /// Attempts beyond the first.
    pub retries: u64,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Publish side of the notifier. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::Sender<RoomNotification>,
    counters: Arc<Counters>,
}

impl Notifier {
    /// Enqueues a notification without waiting.
    ///
    /// # Errors
    /// - [`NotifyError::QueueFull`]: queue at capacity, notification dropped
    /// - [`NotifyError::Closed`]: the notifier task has stopped
    ///
    /// Both are already logged; callers are free to ignore them.
    pub fn publish(
        &self,
        notification: RoomNotification,
    ) -> Result<(), NotifyError> {
        match self.sender.try_send(notification) {
            Ok(()) => {
                self.counters.published.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(n)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    room_id = %n.room_id,
                    request_id = %n.request_id,
                    change = ?n.change,
                    "notification queue full, dropping"
                );
                Err(NotifyError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(n)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    room_id = %n.room_id,
                    request_id = %n.request_id,
                    "notifier stopped, dropping notification"
                );
                Err(NotifyError::Closed)
            }
        }
    }

    pub fn stats(&self) -> NotifierStats {
        let c = &self.counters;
        NotifierStats {
            published: c.published.load(Ordering::Relaxed),
            dropped: c.dropped.load(Ordering::Relaxed),
            delivered: c.delivered.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
            retries: c.retries.load(Ordering::Relaxed),
        }
    }
}

/// Owner handle for the background task.
///
/// Dropping it has the same effect as [`shutdown`](Self::shutdown) without
/// the wait: the task drains the queue and exits.
#[derive(Debug)]
pub struct NotifierTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl NotifierTask {
    /// Stops accepting new notifications, delivers what is already queued
    /// (with retries), and waits for the task to finish.
    pub async fn shutdown(self) -> Result<(), NotifyError> {
        // The task may already have exited because every Notifier was dropped.
        let _ = self.shutdown.send(());
        self.handle
            .await
            .map_err(|e| NotifyError::Task(e.to_string()))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

struct NotifierActor<S: NotificationSink> {
    sink: S,
    retry: RetryPolicy,
    receiver: mpsc::Receiver<RoomNotification>,
    counters: Arc<Counters>,
    seq: u64,
    started: Instant,
}

impl<S: NotificationSink> NotifierActor<S> {
    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        debug!("notifier started");

        loop {
            tokio::select! {
                maybe = self.receiver.recv() => match maybe {
                    Some(n) => self.dispatch(n).await,
                    None => break,
                },
                _ = &mut shutdown => {
                    self.receiver.close();
                    while let Some(n) = self.receiver.recv().await {
                        self.dispatch(n).await;
                    }
                    break;
                }
            }
        }

        info!(
            delivered = self.counters.delivered.load(Ordering::Relaxed),
            failed = self.counters.failed.load(Ordering::Relaxed),
            "notifier stopped"
        );
    }

    async fn dispatch(&mut self, notification: RoomNotification) {
        self.seq += 1;
        let envelope = NotificationEnvelope {
            seq: self.seq,
            timestamp: self.started.elapsed().as_millis() as u64,
            notification,
        };

        let mut attempt = 1;
        loop {
            match self.sink.deliver(&envelope).await {
                Ok(()) => {
                    self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                    trace!(seq = envelope.seq, attempt, "notification delivered");
                    return;
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    debug!(
                        seq = envelope.seq,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "delivery failed, retrying"
                    );
                    time::sleep(delay).await;
                    self.counters.retries.fetch_add(1, Ordering::Relaxed);
                    attempt += 1;
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        seq = envelope.seq,
                        room_id = %envelope.notification.room_id,
                        request_id = %envelope.notification.request_id,
                        attempts = attempt,
                        error = %e,
                        "giving up on notification"
                    );
                    return;
                }
            }
        }
    }
}

/// Spawns the notifier task on the current Tokio runtime.
///
/// The task ends when [`NotifierTask::shutdown`] is called or every
/// [`Notifier`] clone has been dropped, after draining the queue.
pub fn spawn_notifier<S: NotificationSink>(
    sink: S,
    config: NotifierConfig,
) -> (Notifier, NotifierTask) {
    let config = config.validated();
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let counters = Arc::new(Counters::default());

    let actor = NotifierActor {
        sink,
        retry: config.retry,
        receiver: rx,
        counters: Arc::clone(&counters),
        seq: 0,
        started: Instant::now(),
    };
    let handle = tokio::spawn(actor.run(shutdown_rx));

    (
        Notifier {
            sender: tx,
            counters,
        },
        NotifierTask {
            shutdown: shutdown_tx,
            handle,
        },
    )
}
