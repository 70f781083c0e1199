//! Background Tasks Module
//!
//! Contains background work that runs for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Sweep: removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::Sweeper;
