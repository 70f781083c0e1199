//! Bounded Cache - a thread-safe in-memory byte cache
//!
//! Entries live under `bucket:key` identities, expire after a configurable
//! TTL and are evicted least-recently-used first once capacity is reached.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    with_eviction_policy, with_ttl, BoundedCache, CacheConfig, CacheOption, CacheStats,
    EvictionPolicy, ScopedCache,
};
pub use config::CacheSettings;
pub use error::{CacheError, Result};
