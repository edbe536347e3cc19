//! Room notifications for Billet.
//!
//! After the room layer commits an occupancy change it hands a
//! [`RoomNotification`](billet_types::RoomNotification) to a [`Notifier`].
//! A background task stamps it into an envelope and pushes it to a
//! [`NotificationSink`], retrying with exponential backoff and jitter.
//!
//! Delivery is best effort. A full queue or a sink that keeps failing is
//! logged and counted in [`NotifierStats`], never reported back to the
//! operation that triggered the notification.
//!
//! ```rust,ignore
//! let (sink, mut outbox) = OutboxSink::channel(JsonCodec);
//! let (notifier, task) = spawn_notifier(sink, NotifierConfig::default());
//!
//! notifier.publish(notification)?;
//! let bytes = outbox.recv().await;
//!
//! drop(notifier);
//! task.shutdown().await?;
//! ```

mod config;
mod error;
mod notifier;
mod sink;

pub use config::{NotifierConfig, RetryPolicy};
pub use error::NotifyError;
pub use notifier::{Notifier, NotifierStats, NotifierTask, spawn_notifier};
pub use sink::{DEFAULT_MAX_PAYLOAD, NotificationSink, OutboxSink};
