//! Cache Module
//!
//! Provides a bounded in-memory byte cache with TTL expiration and
//! pluggable eviction.

mod bounded;
mod entry;
mod lru;
mod options;
mod policy;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use bounded::{BoundedCache, ScopedCache};
pub use entry::{composite_key, CacheEntry};
pub use lru::{Handle, RecencyList};
pub use options::{apply_options, with_eviction_policy, with_ttl, CacheConfig, CacheOption};
pub use policy::EvictionPolicy;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum number of entries a cache holds unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 256;

/// Interval between background expiration sweeps unless configured otherwise
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
