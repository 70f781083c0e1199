//! Configuration Module
//!
//! Handles loading cache construction settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{with_ttl, CacheOption, DEFAULT_CAPACITY, DEFAULT_SWEEP_INTERVAL};

/// Construction-time cache settings.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL applied at construction, zero disables expiration
    pub ttl: Duration,
    /// Interval between background expiration sweeps
    pub sweep_interval: Duration,
}

impl CacheSettings {
    /// Creates new settings by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 256)
    /// - `CACHE_TTL_SECS` - TTL in seconds, 0 disables expiry (default: 0)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_parse("CACHE_CAPACITY")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.capacity),
            ttl: env_parse("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            sweep_interval: env_parse("SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Options to apply when constructing a cache from these settings.
    pub fn initial_options(&self) -> Vec<CacheOption> {
        vec![with_ttl(self.ttl)]
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: Duration::ZERO,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = CacheSettings::default();
        assert_eq!(settings.capacity, 256);
        assert_eq!(settings.ttl, Duration::ZERO);
        assert_eq!(settings.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_settings_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("SWEEP_INTERVAL_SECS");

        assert_eq!(CacheSettings::from_env(), CacheSettings::default());
    }

    #[test]
    fn test_initial_options_carry_ttl() {
        let settings = CacheSettings {
            ttl: Duration::from_secs(30),
            ..CacheSettings::default()
        };
        assert_eq!(settings.initial_options(), vec![with_ttl(Duration::from_secs(30))]);
    }
}
