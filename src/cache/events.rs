//! Cache event system.
//!
//! Subscribers observe entry updates, invalidations and evictions through a
//! tokio broadcast channel. Events are informational; dropping the receiver
//! or lagging behind never affects cache behavior.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

use super::keys::QueryKey;

/// Monotonic epoch for ordering events within one cache.
pub type Epoch = u64;

#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Unique identifier (UUIDv4).
    pub id: Uuid,
    pub epoch: Epoch,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A load completed and its value was committed.
    Updated { key: QueryKey },
    /// Entries under `prefix` were marked stale.
    Invalidated { prefix: QueryKey, affected: usize },
    /// An entry was dropped to stay within capacity.
    Evicted { key: QueryKey },
    /// Every entry was removed.
    Cleared,
}

pub(crate) struct EventBus {
    sender: broadcast::Sender<CacheEvent>,
    epoch: AtomicU64,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            epoch: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&self, kind: EventKind) {
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        let event = CacheEvent {
            id: Uuid::new_v4(),
            epoch,
            kind,
        };
        // No receivers is the common case for one-shot commands.
        if self.sender.send(event).is_err() {
            trace!(epoch, "cache event published without subscribers");
        }
    }
}
