//! Cache Options Module
//!
//! Runtime configuration of a cache and the options that mutate it.

use std::time::Duration;

use serde::Serialize;

use crate::cache::EvictionPolicy;
use crate::error::Result;

// == Cache Config ==
/// Runtime configuration consulted by every data operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheConfig {
    /// Maximum age since last update, zero disables expiration
    pub ttl: Duration,
    /// Rule for choosing eviction victims
    pub eviction_policy: EvictionPolicy,
}

impl CacheConfig {
    /// Returns a copy of this config with every option applied in order.
    pub fn with_options(mut self, options: &[CacheOption]) -> Result<Self> {
        apply_options(&mut self, options)?;
        Ok(self)
    }
}

// == Cache Option ==
/// A single configuration change.
///
/// Options are validated when applied, not when built, so a bad policy name
/// surfaces from the operation that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOption {
    /// Expiry duration; zero disables expiration
    Ttl(Duration),
    /// Eviction policy name, validated when applied
    EvictionPolicy(String),
}

impl CacheOption {
    /// Applies this option to `config`, leaving it untouched on error.
    pub fn apply(&self, config: &mut CacheConfig) -> Result<()> {
        match self {
            CacheOption::Ttl(ttl) => config.ttl = *ttl,
            CacheOption::EvictionPolicy(name) => config.eviction_policy = name.parse()?,
        }
        Ok(())
    }
}

/// Sets the expiry duration; zero disables expiration.
pub fn with_ttl(ttl: Duration) -> CacheOption {
    CacheOption::Ttl(ttl)
}

/// Sets the active eviction policy by name. Recognized: `"Oldest"`.
pub fn with_eviction_policy(name: impl Into<String>) -> CacheOption {
    CacheOption::EvictionPolicy(name.into())
}

/// Applies options in order, stopping at the first failure.
///
/// Options before the failing one stay applied.
pub fn apply_options(config: &mut CacheConfig, options: &[CacheOption]) -> Result<()> {
    options.iter().try_for_each(|option| option.apply(config))
}
