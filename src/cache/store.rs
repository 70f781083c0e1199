//! Cache Store Module
//!
//! Single-threaded cache engine: composite-key index over a recency list,
//! capacity eviction and TTL expiration. Callers provide the locking.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cache::entry::composite_key;
use crate::cache::lru::{Handle, RecencyList};
use crate::cache::options::{apply_options, CacheConfig, CacheOption};
use crate::cache::{CacheEntry, CacheStats, EvictionPolicy};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Index and recency list kept in bijection, plus the shared configuration.
#[derive(Debug)]
pub struct CacheStore {
    /// Composite key to list handle
    index: HashMap<String, Handle>,
    /// Entries ordered most to least recently used
    entries: RecencyList<CacheEntry>,
    /// Configuration used by calls without an explicit snapshot
    config: CacheConfig,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries (minimum 1)
    /// with the default configuration.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            entries: RecencyList::with_capacity(capacity),
            config: CacheConfig::default(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    /// Returns the shared configuration.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    // == Apply Options ==
    /// Applies options to the shared configuration, stopping at the first
    /// failure. The change persists for every later call.
    pub fn apply_options(&mut self, options: &[CacheOption]) -> Result<()> {
        if options.is_empty() {
            return Ok(());
        }
        apply_options(&mut self.config, options)
    }

    // == Set ==
    /// Applies `options` then stores `value` under `bucket:key`.
    ///
    /// # Arguments
    /// * `bucket` - Namespace of the entry
    /// * `key` - Key within the bucket
    /// * `value` - The bytes to store
    /// * `options` - Configuration changes applied first, persisting afterwards
    pub fn set(
        &mut self,
        bucket: &str,
        key: &str,
        value: Vec<u8>,
        options: &[CacheOption],
    ) -> Result<()> {
        self.apply_options(options)?;
        let config = self.config;
        self.set_with(bucket, key, value, &config);
        Ok(())
    }

    /// Stores `value` under `bucket:key` using `config` for eviction.
    ///
    /// A full store first evicts one entry per the configured policy, even
    /// when `bucket:key` is already present. An existing entry then gets the
    /// new value, a fresh expiry clock and the front of the recency list; if
    /// it was the one evicted, it is stored again as a new entry.
    pub fn set_with(&mut self, bucket: &str, key: &str, value: Vec<u8>, config: &CacheConfig) {
        let composite = composite_key(bucket, key);

        while self.entries.len() >= self.capacity {
            if self.evict(config.eviction_policy).is_none() {
                break;
            }
        }

        if let Some(&handle) = self.index.get(&composite) {
            if let Some(entry) = self.entries.get_mut(handle) {
                entry.touch(value);
                self.entries.move_to_front(handle);
                trace!(key = %composite, "updated entry");
                return;
            }
            // Dangling index slot; fall through and re-insert
            self.index.remove(&composite);
        }

        let entry = CacheEntry::new(bucket, key, value);
        let handle = self.entries.push_front(entry);
        self.index.insert(composite, handle);
    }

    // == Get ==
    /// Applies `options` then looks up `bucket:key`.
    pub fn get(&mut self, bucket: &str, key: &str, options: &[CacheOption]) -> Result<Vec<u8>> {
        self.apply_options(options)?;
        let config = self.config;
        self.get_with(bucket, key, &config)
    }

    /// Looks up `bucket:key` judging expiry against `config`.
    ///
    /// An expired entry is removed and reported as `Expired` without being
    /// promoted. A live hit moves to the front but keeps its expiry clock.
    pub fn get_with(&mut self, bucket: &str, key: &str, config: &CacheConfig) -> Result<Vec<u8>> {
        let composite = composite_key(bucket, key);

        let Some(&handle) = self.index.get(&composite) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(composite));
        };

        let expired = match self.entries.get(handle) {
            Some(entry) => entry.is_expired(config.ttl),
            None => {
                self.index.remove(&composite);
                self.stats.record_miss();
                return Err(CacheError::NotFound(composite));
            }
        };

        if expired {
            self.remove_handle(handle);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key = %composite, "entry expired on lookup");
            return Err(CacheError::Expired(composite));
        }

        self.entries.move_to_front(handle);
        self.stats.record_hit();
        let value = self
            .entries
            .get(handle)
            .map(|entry| entry.value.clone())
            .unwrap_or_default();
        Ok(value)
    }

    // == Delete ==
    /// Applies `options` then removes `bucket:key`.
    pub fn delete(&mut self, bucket: &str, key: &str, options: &[CacheOption]) -> Result<()> {
        self.apply_options(options)?;
        self.remove(bucket, key)
    }

    /// Removes `bucket:key`, failing with `NotFound` when absent.
    pub fn remove(&mut self, bucket: &str, key: &str) -> Result<()> {
        let composite = composite_key(bucket, key);
        let removed = self
            .index
            .remove(&composite)
            .and_then(|handle| self.entries.remove(handle));
        match removed {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(composite)),
        }
    }

    /// Presence test that neither promotes nor expires.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.index.contains_key(&composite_key(bucket, key))
    }

    // == Evict ==
    /// Removes one entry chosen by `policy`.
    fn evict(&mut self, policy: EvictionPolicy) -> Option<CacheEntry> {
        let victim = policy.select_victim(&self.entries)?;
        let entry = self.remove_handle(victim)?;
        self.stats.record_eviction();
        debug!(key = %entry.key, policy = %policy, "evicted entry");
        Some(entry)
    }

    fn remove_handle(&mut self, handle: Handle) -> Option<CacheEntry> {
        let entry = self.entries.remove(handle)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    // == Purge Expired ==
    /// Removes every live entry older than the configured TTL.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let ttl = self.config.ttl;
        if ttl.is_zero() {
            return 0;
        }

        let now = Instant::now();
        let expired: Vec<Handle> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(ttl, now))
            .map(|(handle, _)| handle)
            .collect();

        let removed = expired
            .into_iter()
            .filter_map(|handle| self.remove_handle(handle))
            .count();
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries the store holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Integrity ==
    /// Checks that every index slot resolves to a live node carrying the
    /// same key, and every node walked front to back is indexed.
    pub fn verify_integrity(&self) -> bool {
        if self.index.len() != self.entries.len() || self.entries.len() > self.capacity {
            return false;
        }

        let indexed = self.index.iter().all(|(key, &handle)| {
            self.entries
                .get(handle)
                .map_or(false, |entry| entry.key == *key)
        });

        let mut walked = 0;
        let listed = self.entries.iter().all(|(handle, entry)| {
            walked += 1;
            self.index.get(&entry.key) == Some(&handle)
        });

        indexed && listed && walked == self.entries.len()
    }

    /// Composite keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(_, entry)| entry.key.clone()).collect()
    }
}
