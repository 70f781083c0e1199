//! Bounded Cache Module
//!
//! Thread-safe handle over [`CacheStore`] that owns the TTL sweep worker.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::options::{CacheConfig, CacheOption};
use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheSettings;
use crate::error::{CacheError, Result};
use crate::tasks::Sweeper;

// == Bounded Cache ==
/// A capacity-bounded byte cache safe to share between threads.
///
/// Every operation, lookups included, runs under one exclusive lock since a
/// hit reorders the recency list and an expired hit deletes. Options passed
/// to `set`, `get` and `delete` update the shared configuration and stay in
/// effect for all later calls; use [`scoped`](Self::scoped) for per-call
/// settings.
pub struct BoundedCache {
    store: Arc<Mutex<CacheStore>>,
    sweeper: Sweeper,
}

impl BoundedCache {
    // == Constructors ==
    /// Creates a cache with default settings, then applies `options` in
    /// order. The first rejected option fails construction.
    pub fn new(options: &[CacheOption]) -> Result<Self> {
        Self::with_settings(&CacheSettings::default(), options)
    }

    /// Like [`new`](Self::new) with a custom capacity.
    pub fn with_capacity(capacity: usize, options: &[CacheOption]) -> Result<Self> {
        let settings = CacheSettings {
            capacity,
            ..CacheSettings::default()
        };
        Self::with_settings(&settings, options)
    }

    /// Builds a cache from `settings`, applies `options` and starts the
    /// sweep worker.
    pub fn with_settings(settings: &CacheSettings, options: &[CacheOption]) -> Result<Self> {
        if settings.capacity == 0 {
            return Err(CacheError::InvalidOption("capacity must be at least 1".to_string()));
        }
        if settings.sweep_interval.is_zero() {
            return Err(CacheError::InvalidOption(
                "sweep interval must be non-zero".to_string(),
            ));
        }

        let mut store = CacheStore::new(settings.capacity);
        store.apply_options(&settings.initial_options())?;
        store.apply_options(options)?;
        let config = store.config();

        let store = Arc::new(Mutex::new(store));
        let sweeper = Sweeper::spawn(Arc::clone(&store), settings.sweep_interval)?;

        info!(
            capacity = settings.capacity,
            ttl_ms = config.ttl.as_millis() as u64,
            policy = %config.eviction_policy,
            "cache initialized"
        );

        Ok(Self { store, sweeper })
    }

    // == Data Operations ==
    /// Stores `value` under `bucket:key` after applying `options`.
    pub fn set(
        &self,
        bucket: &str,
        key: &str,
        value: impl Into<Vec<u8>>,
        options: &[CacheOption],
    ) -> Result<()> {
        self.store.lock().set(bucket, key, value.into(), options)
    }

    /// Returns a copy of the value under `bucket:key` after applying `options`.
    ///
    /// Fails with `NotFound` on a miss and `Expired` when the entry outlived
    /// the TTL, in which case it is removed.
    pub fn get(&self, bucket: &str, key: &str, options: &[CacheOption]) -> Result<Vec<u8>> {
        self.store.lock().get(bucket, key, options)
    }

    /// Removes `bucket:key` after applying `options`.
    pub fn delete(&self, bucket: &str, key: &str, options: &[CacheOption]) -> Result<()> {
        self.store.lock().delete(bucket, key, options)
    }

    // == Configuration ==
    /// Applies options to the shared configuration, stopping at the first
    /// failure.
    pub fn apply_options(&self, options: &[CacheOption]) -> Result<()> {
        self.store.lock().apply_options(options)
    }

    /// Process-wide configuration change for every caller of this cache.
    pub fn reconfigure(&self, options: &[CacheOption]) -> Result<()> {
        let mut store = self.store.lock();
        store.apply_options(options)?;
        let config = store.config();
        info!(
            ttl_ms = config.ttl.as_millis() as u64,
            policy = %config.eviction_policy,
            "cache reconfigured"
        );
        Ok(())
    }

    /// Snapshot of the shared configuration.
    pub fn config(&self) -> CacheConfig {
        self.store.lock().config()
    }

    /// A view whose operations use `config` instead of the shared
    /// configuration and never modify it.
    pub fn scoped(&self, config: CacheConfig) -> ScopedCache<'_> {
        ScopedCache { cache: self, config }
    }

    // == Introspection ==
    /// Presence test that neither promotes nor expires.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.store.lock().contains(bucket, key)
    }

    /// Runs one expiration pass now, returning the number removed.
    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Returns the maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Checks the index/list bijection.
    pub fn is_consistent(&self) -> bool {
        self.store.lock().verify_integrity()
    }

    // == Lifecycle ==
    /// Stops the sweep worker and waits for it to exit.
    ///
    /// The cache stays usable afterwards; expired entries are then only
    /// reclaimed lazily or through [`purge_expired`](Self::purge_expired).
    pub fn close(&self) {
        self.sweeper.stop();
    }

    /// Returns true once the sweep worker is no longer running.
    pub fn is_closed(&self) -> bool {
        !self.sweeper.is_running()
    }
}

impl fmt::Debug for BoundedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock();
        f.debug_struct("BoundedCache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .field("config", &store.config())
            .finish()
    }
}

// == Scoped Cache ==
/// Cache view bound to an immutable configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ScopedCache<'a> {
    cache: &'a BoundedCache,
    config: CacheConfig,
}

impl ScopedCache<'_> {
    /// The snapshot this view evaluates TTL and eviction against.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Stores `value` under `bucket:key`, evicting per the snapshot's policy.
    pub fn set(&self, bucket: &str, key: &str, value: impl Into<Vec<u8>>) {
        self.cache
            .store
            .lock()
            .set_with(bucket, key, value.into(), &self.config);
    }

    /// Looks up `bucket:key`, judging expiry by the snapshot's TTL.
    pub fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.cache.store.lock().get_with(bucket, key, &self.config)
    }

    /// Removes `bucket:key`, failing with `NotFound` when absent.
    pub fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.cache.store.lock().remove(bucket, key)
    }
}
