//! `BilletService` builder and lifecycle.
//!
//! Ties the layers together: a store, the inventory and assignment
//! services over it, and the notifier task feeding a sink.

use std::sync::Arc;

use billet_notify::{
    NotificationSink, Notifier, NotifierConfig, NotifierStats, NotifierTask,
    spawn_notifier,
};
use billet_room::{
    AccommodationConfig, OccupyRequest, ReassignPolicy, RoomAssignment,
    RoomInventory, UnoccupyRequest,
};
use billet_store::Store;
use billet_types::AccommodationRequest;
use serde::{Deserialize, Serialize};

use crate::BilletError;

/// Everything configurable about a [`BilletService`], loadable from JSON.
///
/// Missing fields take their defaults:
///
/// ```rust
/// use billet::BilletConfig;
///
/// let config = BilletConfig::from_json(
///     r#"{ "accommodation": { "max_rooms_per_batch": 50 } }"#,
/// ).unwrap();
/// assert_eq!(config.accommodation.max_rooms_per_batch, 50);
/// assert_eq!(config.notifier.queue_capacity, 1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilletConfig {
    pub accommodation: AccommodationConfig,
    pub notifier: NotifierConfig,
}

impl BilletConfig {
    pub fn from_json(json: &str) -> Result<Self, BilletError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for a [`BilletService`].
///
/// # Example
///
/// ```rust,ignore
/// use billet::prelude::*;
///
/// let (sink, outbox) = OutboxSink::channel(JsonCodec);
/// let service = BilletServiceBuilder::new()
///     .reassignment(ReassignPolicy::RejectReassignment)
///     .build(Arc::new(InMemoryStore::new()), sink);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BilletServiceBuilder {
    config: BilletConfig,
}

impl BilletServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: BilletConfig) -> Self {
        self.config = config;
        self
    }

    pub fn accommodation_config(mut self, config: AccommodationConfig) -> Self {
        self.config.accommodation = config;
        self
    }

    pub fn notifier_config(mut self, config: NotifierConfig) -> Self {
        self.config.notifier = config;
        self
    }

    pub fn reassignment(mut self, policy: ReassignPolicy) -> Self {
        self.config.accommodation.reassignment = policy;
        self
    }

    /// Builds the service and spawns its notifier task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build<S: Store, K: NotificationSink>(
        self,
        store: Arc<S>,
        sink: K,
    ) -> BilletService<S> {
        let BilletConfig {
            accommodation,
            notifier,
        } = self.config;
        let (notifier, task) = spawn_notifier(sink, notifier);

        tracing::info!(
            reassignment = ?accommodation.reassignment,
            max_rooms_per_batch = accommodation.max_rooms_per_batch,
            "billet service started"
        );

        BilletService {
            inventory: RoomInventory::new(
                Arc::clone(&store),
                accommodation.clone(),
            ),
            assignment: RoomAssignment::new(
                store,
                notifier.clone(),
                accommodation,
            ),
            notifier,
            task,
        }
    }
}

/// A running accommodation service.
///
/// Call [`shutdown`](Self::shutdown) to flush pending notifications before
/// exiting.
pub struct BilletService<S: Store> {
    inventory: RoomInventory<S>,
    assignment: RoomAssignment<S>,
    notifier: Notifier,
    task: NotifierTask,
}

impl<S: Store> BilletService<S> {
    /// Room types and rooms.
    pub fn inventory(&self) -> &RoomInventory<S> {
        &self.inventory
    }

    /// The assignment engine. Clone it to hand to other tasks.
    pub fn assignment(&self) -> &RoomAssignment<S> {
        &self.assignment
    }

    /// Shorthand for `assignment().occupy_room(..)`.
    pub async fn occupy_room(
        &self,
        cmd: OccupyRequest,
    ) -> Result<AccommodationRequest, BilletError> {
        Ok(self.assignment.occupy_room(cmd).await?)
    }

    /// Shorthand for `assignment().unoccupy_room(..)`.
    pub async fn unoccupy_room(
        &self,
        cmd: UnoccupyRequest,
    ) -> Result<AccommodationRequest, BilletError> {
        Ok(self.assignment.unoccupy_room(cmd).await?)
    }

    pub fn notifier_stats(&self) -> NotifierStats {
        self.notifier.stats()
    }

    /// Stops the notifier after delivering everything already queued.
    ///
    /// Notifications published afterwards through cloned assignment
    /// engines are dropped.
    pub async fn shutdown(self) -> Result<NotifierStats, BilletError> {
        let Self { notifier, task, .. } = self;
        task.shutdown().await?;
        let stats = notifier.stats();
        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            dropped = stats.dropped,
            "billet service stopped"
        );
        Ok(stats)
    }
}
