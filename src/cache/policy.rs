//! Eviction Policy Module
//!
//! Selects which entry to remove when the cache is at capacity.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::lru::{Handle, RecencyList};
use crate::error::CacheError;

/// Rule used to pick an eviction victim.
///
/// Each variant only chooses a handle; unlinking the node and dropping its
/// index entry stay with the store, so a new policy is one more match arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EvictionPolicy {
    /// Remove the least recently used or inserted entry.
    #[default]
    Oldest,
}

impl EvictionPolicy {
    /// Every policy the cache recognizes.
    pub const ALL: &'static [EvictionPolicy] = &[EvictionPolicy::Oldest];

    /// The configuration name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            EvictionPolicy::Oldest => "Oldest",
        }
    }

    /// Picks the entry to evict, or `None` when the list is empty.
    pub fn select_victim<T>(&self, entries: &RecencyList<T>) -> Option<Handle> {
        match self {
            EvictionPolicy::Oldest => entries.back(),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|policy| policy.name() == name)
            .ok_or_else(|| CacheError::InvalidOption(format!("unknown eviction policy '{}'", name)))
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_oldest() {
        assert_eq!(EvictionPolicy::default(), EvictionPolicy::Oldest);
    }

    #[test]
    fn test_parse_known_policy() {
        assert_eq!("Oldest".parse::<EvictionPolicy>(), Ok(EvictionPolicy::Oldest));
        assert_eq!(EvictionPolicy::Oldest.to_string(), "Oldest");
    }

    #[test]
    fn test_parse_unknown_policy() {
        let err = "Newest".parse::<EvictionPolicy>().unwrap_err();
        assert!(matches!(err, CacheError::InvalidOption(msg) if msg.contains("Newest")));
    }

    #[test]
    fn test_oldest_selects_back() {
        let mut list = RecencyList::new();
        let first = list.push_front(1);
        list.push_front(2);

        assert_eq!(EvictionPolicy::Oldest.select_victim(&list), Some(first));
        assert_eq!(EvictionPolicy::Oldest.select_victim(&RecencyList::<u8>::new()), None);
    }
}
