//! Query cache.
//!
//! Every read the console performs goes through a [`QueryCache`] keyed by a
//! [`QueryKey`] (resource name followed by its parameters). The cache:
//!
//! - returns a fresh entry without calling the loader;
//! - attaches concurrent callers for the same key to a single in-flight load;
//! - marks whole key families stale by segment-wise prefix ([`QueryCache::invalidate`]);
//! - never caches a failed load;
//! - bounds its size with LRU eviction and announces changes on a broadcast channel.
//!
//! ```toml
//! [cache]
//! stale_after_ms = 30000
//! max_entries = 256
//! ```

mod config;
mod events;
mod keys;
mod lock;
mod store;

pub use self::config::CacheConfig;
pub use events::{CacheEvent, Epoch, EventKind};
pub use keys::QueryKey;
pub use store::{EntryStatus, KeyTypeMismatch, QueryCache};

pub(crate) use lock::{mutex_lock, rw_read, rw_write};
