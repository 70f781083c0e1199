//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their expiry clock.

use std::time::{Duration, Instant};

/// Separator between bucket and key in a composite key.
pub const KEY_SEPARATOR: char = ':';

/// Builds the composite key `bucket:key` used as the index identity.
pub fn composite_key(bucket: &str, key: &str) -> String {
    let mut composite = String::with_capacity(bucket.len() + key.len() + 1);
    composite.push_str(bucket);
    composite.push(KEY_SEPARATOR);
    composite.push_str(key);
    composite
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Logical namespace the entry was stored under
    pub bucket: String,
    /// Composite `bucket:key` identity
    pub key: String,
    /// The stored bytes, replaced wholesale on update
    pub value: Vec<u8>,
    /// Set at creation and reset on every update
    pub touched_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(bucket: &str, key: &str, value: Vec<u8>) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: composite_key(bucket, key),
            value,
            touched_at: Instant::now(),
        }
    }

    // == Touch ==
    /// Replaces the value and restarts the expiry clock.
    pub fn touch(&mut self, value: Vec<u8>) {
        self.value = value;
        self.touched_at = Instant::now();
    }

    /// Time elapsed since the entry was created or last updated.
    pub fn age(&self) -> Duration {
        self.touched_at.elapsed()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// A zero `ttl` never expires. Otherwise the entry is expired once the
    /// elapsed time strictly exceeds `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(ttl, Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed `now`, so a
    /// sweep pass judges every entry by the same instant.
    pub fn is_expired_at(&self, ttl: Duration, now: Instant) -> bool {
        !ttl.is_zero() && now.saturating_duration_since(self.touched_at) > ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn aged_entry(age: Duration) -> CacheEntry {
        let mut entry = CacheEntry::new("bucket", "key", b"value".to_vec());
        entry.touched_at = Instant::now().checked_sub(age).unwrap();
        entry
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("users", "42"), "users:42");
        assert_eq!(composite_key("", "k"), ":k");
    }

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("bucket", "key", b"value".to_vec());

        assert_eq!(entry.bucket, "bucket");
        assert_eq!(entry.key, "bucket:key");
        assert_eq!(entry.value, b"value");
        assert!(entry.age() < Duration::from_secs(1));
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let entry = aged_entry(Duration::from_secs(3600));
        assert!(!entry.is_expired(Duration::ZERO));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = aged_entry(Duration::from_secs(5));

        assert!(entry.is_expired(Duration::from_secs(1)));
        assert!(!entry.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("bucket", "key", Vec::new());
        let ttl = Duration::from_secs(1);

        // Elapsed time equal to the TTL is still live
        assert!(!entry.is_expired_at(ttl, entry.touched_at + ttl));
        assert!(entry.is_expired_at(ttl, entry.touched_at + ttl + Duration::from_nanos(1)));
    }

    #[test]
    fn test_touch_resets_clock() {
        let mut entry = aged_entry(Duration::from_secs(5));
        assert!(entry.is_expired(Duration::from_secs(1)));

        entry.touch(b"fresh".to_vec());

        assert_eq!(entry.value, b"fresh");
        assert!(!entry.is_expired(Duration::from_secs(1)));
    }

    #[test]
    fn test_age_grows() {
        let entry = CacheEntry::new("bucket", "key", Vec::new());
        sleep(Duration::from_millis(20));
        assert!(entry.age() >= Duration::from_millis(20));
    }
}
