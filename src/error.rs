//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was present but its TTL had elapsed; the entry has been removed
    #[error("Key expired: {0}")]
    Expired(String),

    /// A configuration option rejected its argument
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Internal failure, such as the sweep worker failing to start
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Returns true for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    /// Returns true for the `Expired` variant.
    pub fn is_expired(&self) -> bool {
        matches!(self, CacheError::Expired(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
