//! Query cache storage.
//!
//! Values are type-erased (`Arc<dyn Any + Send + Sync>`) so one cache serves
//! every resource; [`QueryCache::fetch`] downcasts back to the caller's type.
//! A key that is read with two different types is a programming error and is
//! reported as [`KeyTypeMismatch`].

use std::{
    any::{Any, type_name},
    fmt,
    future::Future,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use metrics::{counter, gauge};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::events::{CacheEvent, EventBus, EventKind};
use super::keys::QueryKey;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::store";

type Value = Arc<dyn Any + Send + Sync>;
type LoadFuture<E> = Shared<BoxFuture<'static, Result<Value, E>>>;

/// A cached value was read back as a different type than it was stored with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cache entry `{key}` does not hold a `{expected}`")]
pub struct KeyTypeMismatch {
    pub key: String,
    pub expected: &'static str,
}

/// Observable lifecycle state of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Loading,
    Fresh,
    Stale,
    Errored,
}

// ============================================================================
// Entries
// ============================================================================

enum Slot<E> {
    Loading {
        load_id: u64,
        future: LoadFuture<E>,
        /// Set by invalidation while the load runs; the value then lands stale.
        invalidated: bool,
    },
    Ready {
        value: Value,
        loaded_at: Instant,
        stale: bool,
    },
    Errored,
}

impl<E> Slot<E> {
    fn status(&self, stale_after: Duration) -> EntryStatus {
        match self {
            Slot::Loading { .. } => EntryStatus::Loading,
            Slot::Ready {
                loaded_at, stale, ..
            } => {
                if !*stale && loaded_at.elapsed() < stale_after {
                    EntryStatus::Fresh
                } else {
                    EntryStatus::Stale
                }
            }
            Slot::Errored => EntryStatus::Errored,
        }
    }
}

enum Lookup<E> {
    Hit(Value),
    Attach(LoadFuture<E>),
    Load,
}

struct Inner<E> {
    entries: Mutex<LruCache<QueryKey, Slot<E>>>,
    stale_after: Duration,
    next_load_id: AtomicU64,
    events: EventBus,
}

// ============================================================================
// QueryCache
// ============================================================================

/// Shared, explicitly constructed query cache.
///
/// Cloning is cheap and every clone observes the same entries.
pub struct QueryCache<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for QueryCache<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for QueryCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_after", &self.inner.stale_after)
            .finish_non_exhaustive()
    }
}

impl<E> QueryCache<E>
where
    E: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(LruCache::new(config.max_entries_non_zero())),
                stale_after: config.stale_after(),
                next_load_id: AtomicU64::new(1),
                events: EventBus::new(config.event_capacity()),
            }),
        }
    }

    /// Return the cached value for `key`, joining or starting a load as needed.
    ///
    /// - a fresh entry is returned without calling `loader`;
    /// - a load already in flight for `key` is shared, `loader` is dropped;
    /// - otherwise `loader` runs and its value is committed on success.
    ///
    /// Errors are returned unchanged and never cached.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        E: From<KeyTypeMismatch>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let future = match self.lookup(key) {
            Lookup::Hit(value) => {
                counter!("imanage_query_cache_hit_total", "resource" => key.resource().to_string())
                    .increment(1);
                trace!(key = %key, "query cache hit");
                return downcast(key, value);
            }
            Lookup::Attach(future) => {
                counter!("imanage_query_cache_dedup_total", "resource" => key.resource().to_string())
                    .increment(1);
                trace!(key = %key, "attached to in-flight load");
                future
            }
            Lookup::Load => {
                counter!("imanage_query_cache_miss_total", "resource" => key.resource().to_string())
                    .increment(1);
                self.start_load(key, loader())
            }
        };

        let value = future.await?;
        downcast(key, value)
    }

    /// Mark every entry under `prefix` stale and return how many were affected.
    ///
    /// Loads in flight for matching keys keep running; their value lands stale
    /// and the next fetch starts a new load.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let affected = {
            let mut entries = mutex_lock(&self.inner.entries, SOURCE, "invalidate");
            let mut affected = 0;
            for (key, slot) in entries.iter_mut() {
                if !key.starts_with(prefix) {
                    continue;
                }
                match slot {
                    Slot::Ready { stale, .. } => {
                        *stale = true;
                        affected += 1;
                    }
                    Slot::Loading { invalidated, .. } => {
                        *invalidated = true;
                        affected += 1;
                    }
                    Slot::Errored => {}
                }
            }
            affected
        };

        counter!("imanage_query_cache_invalidated_total").increment(affected as u64);
        debug!(prefix = %prefix, affected, "query cache invalidated");
        self.inner.events.publish(EventKind::Invalidated {
            prefix: prefix.clone(),
            affected,
        });
        affected
    }

    /// Lifecycle state of `key`, without touching its recency.
    pub fn state(&self, key: &QueryKey) -> Option<EntryStatus> {
        let entries = mutex_lock(&self.inner.entries, SOURCE, "state");
        entries
            .peek(key)
            .map(|slot| slot.status(self.inner.stale_after))
    }

    /// Drop every entry. Loads in flight complete but are not committed.
    pub fn clear(&self) {
        mutex_lock(&self.inner.entries, SOURCE, "clear").clear();
        gauge!("imanage_query_cache_entries").set(0.0);
        self.inner.events.publish(EventKind::Cleared);
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.inner.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn lookup(&self, key: &QueryKey) -> Lookup<E> {
        let mut entries = mutex_lock(&self.inner.entries, SOURCE, "lookup");
        match entries.get(key) {
            Some(slot @ Slot::Ready { value, .. })
                if slot.status(self.inner.stale_after) == EntryStatus::Fresh =>
            {
                Lookup::Hit(Arc::clone(value))
            }
            Some(Slot::Loading {
                future,
                invalidated: false,
                ..
            }) => Lookup::Attach(future.clone()),
            _ => Lookup::Load,
        }
    }

    fn start_load<T, Fut>(&self, key: &QueryKey, load: Fut) -> LoadFuture<E>
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let load_id = self.inner.next_load_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let commit_key = key.clone();

        let future = async move {
            let outcome = load.await.map(|value| Arc::new(value) as Value);
            inner.commit(&commit_key, load_id, &outcome);
            outcome
        }
        .boxed()
        .shared();

        let slot = Slot::Loading {
            load_id,
            future: future.clone(),
            invalidated: false,
        };

        let (evicted, len) = {
            let mut entries = mutex_lock(&self.inner.entries, SOURCE, "start_load");
            let evicted = entries
                .push(key.clone(), slot)
                .map(|(evicted, _)| evicted)
                .filter(|evicted| evicted != key);
            (evicted, entries.len())
        };

        gauge!("imanage_query_cache_entries").set(len as f64);
        if let Some(evicted) = evicted {
            counter!("imanage_query_cache_evict_total").increment(1);
            debug!(key = %evicted, "query cache evicted entry");
            self.inner.events.publish(EventKind::Evicted { key: evicted });
        }
        trace!(key = %key, load_id, "query load started");
        future
    }
}

impl<E> Inner<E> {
    /// Record a finished load unless a newer load or a clear superseded it.
    fn commit(&self, key: &QueryKey, load_id: u64, outcome: &Result<Value, E>) {
        let committed = {
            let mut entries = mutex_lock(&self.entries, SOURCE, "commit");
            match entries.peek_mut(key) {
                Some(slot) => match slot {
                    Slot::Loading {
                        load_id: current,
                        invalidated,
                        ..
                    } if *current == load_id => {
                        let invalidated = *invalidated;
                        *slot = match outcome {
                            Ok(value) => Slot::Ready {
                                value: Arc::clone(value),
                                loaded_at: Instant::now(),
                                stale: invalidated,
                            },
                            Err(_) => Slot::Errored,
                        };
                        true
                    }
                    _ => false,
                },
                None => false,
            }
        };

        if !committed {
            trace!(key = %key, load_id, "superseded load result discarded");
            return;
        }

        match outcome {
            Ok(_) => self.events.publish(EventKind::Updated { key: key.clone() }),
            Err(_) => {
                counter!("imanage_query_cache_load_error_total").increment(1);
                debug!(key = %key, load_id, "query load failed; not cached");
            }
        }
    }
}

fn downcast<T, E>(key: &QueryKey, value: Value) -> Result<Arc<T>, E>
where
    T: Send + Sync + 'static,
    E: From<KeyTypeMismatch>,
{
    value.downcast::<T>().map_err(|_| {
        E::from(KeyTypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
    })
}
