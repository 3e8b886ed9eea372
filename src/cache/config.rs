//! Cache configuration.
//!
//! Controls the freshness window and capacity of the query cache via the
//! `[cache]` section of `imanage.toml`.

use std::{num::NonZeroUsize, time::Duration};

use serde::Deserialize;

use crate::config::{DEFAULT_MAX_ENTRIES, DEFAULT_STALE_AFTER_MS};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Query cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long (ms) a loaded entry is served without revalidation. `0` revalidates every fetch.
    pub stale_after_ms: u64,
    /// Maximum number of keys held before least-recently-used entries are evicted.
    pub max_entries: usize,
    /// Buffered events per subscriber before slow receivers start lagging.
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            max_entries: DEFAULT_MAX_ENTRIES,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            stale_after_ms: settings.stale_after_ms,
            max_entries: settings.max_entries,
            ..Self::default()
        }
    }
}

impl CacheConfig {
    /// Config with the given freshness window and default capacity.
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            stale_after_ms: u64::try_from(stale_after.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        }
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the broadcast capacity, clamping to 1 if zero.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}
