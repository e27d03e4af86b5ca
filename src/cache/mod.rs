// Cache module for contributor snapshots.
// Pluggable key-value backends with a TTL-checking JSON layer on top.

pub mod kv;
pub mod paths;
pub mod store;

pub use kv::{FileStore, KvStore, MemoryStore};
pub use paths::cache_dir;
pub use store::{CacheEntry, CacheLookup, CacheStore};
