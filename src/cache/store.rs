// Cache store for reading and writing timestamped snapshots.
// Handles JSON serialization and TTL checking on top of a key-value backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

use super::kv::KvStore;

const LOG_TARGET: &str = "roster::cache";

/// Timestamped cached data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self::with_timestamp(data, Utc::now())
    }

    pub fn with_timestamp(data: T, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }

    /// Age of this entry at `now`.
    ///
    /// A timestamp in the future cannot be trusted and yields `Duration::MAX`.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
            .to_std()
            .unwrap_or(Duration::MAX)
    }

    /// Check if this entry has expired at `now` based on TTL.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age_at(now) > ttl
    }

    /// Check if this entry is still valid (age <= TTL).
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.is_expired_at(now, ttl)
    }
}

/// Outcome of looking up a cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    /// A valid entry.
    Hit(CacheEntry<T>),
    /// Nothing stored under the key.
    Missing,
    /// An entry exists but is older than the TTL.
    Expired { age: Duration },
    /// Stored value could not be read or parsed.
    Corrupt(String),
}

impl<T> CacheLookup<T> {
    /// The valid entry, if any. Expired and corrupt entries count as absent.
    pub fn into_valid(self) -> Option<CacheEntry<T>> {
        match self {
            CacheLookup::Hit(entry) => Some(entry),
            _ => None,
        }
    }
}

/// TTL-aware JSON cache over a key-value backend.
#[derive(Debug)]
pub struct CacheStore<S> {
    backend: S,
    ttl: Duration,
}

impl<S: KvStore> CacheStore<S> {
    pub fn new(backend: S, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Look up `key` as of `now`, classifying what was found.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> CacheLookup<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Missing,
            Err(e) => return CacheLookup::Corrupt(e.to_string()),
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => return CacheLookup::Corrupt(e.to_string()),
        };

        if entry.is_valid_at(now, self.ttl) {
            CacheLookup::Hit(entry)
        } else {
            CacheLookup::Expired {
                age: entry.age_at(now),
            }
        }
    }

    /// Read cached data, returning None if missing, expired or unparsable.
    pub fn read_if_valid<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let lookup = self.lookup(key, Utc::now());
        if let CacheLookup::Corrupt(reason) = &lookup {
            log::warn!(target: LOG_TARGET, "Ignoring unreadable cache entry '{}': {}", key, reason);
        }
        lookup.into_valid()
    }

    /// Replace the entry stored under `key`.
    pub fn write<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.backend.set(key, &json)?;
        log::debug!(target: LOG_TARGET, "Wrote cache entry '{}' ({} bytes)", key, json.len());
        Ok(())
    }
}
