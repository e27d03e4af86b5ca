// Contributor aggregation.
// Drives fetch, enrichment and ranking, and commits complete results to the cache.

use chrono::Utc;

use crate::cache::{CacheEntry, CacheLookup, CacheStore, KvStore};
use crate::config::RosterConfig;
use crate::error::Result;
use crate::github::ContributorSource;
use crate::repo_spec::RepoSpec;

use super::enrich::enrich_all;
use super::pages::fetch_all;
use super::record::ContributorRecord;
use super::role::RoleClassifier;
use super::snapshot::{self, Origin, Snapshot};

const LOG_TARGET: &str = "roster::aggregate";

/// Builds ranked contributor snapshots for one repository.
#[derive(Debug)]
pub struct Aggregator<S, K> {
    source: S,
    cache: CacheStore<K>,
    repo: RepoSpec,
    page_size: u32,
    max_concurrent_lookups: usize,
    classifier: RoleClassifier,
}

impl<S: ContributorSource, K: KvStore> Aggregator<S, K> {
    pub fn new(source: S, backend: K, config: &RosterConfig) -> Self {
        Self {
            source,
            cache: CacheStore::new(backend, config.ttl),
            repo: config.repo.clone(),
            page_size: config.page_size,
            max_concurrent_lookups: config.max_concurrent_lookups,
            classifier: RoleClassifier::new(config.project_lead()),
        }
    }

    pub fn repo(&self) -> &RepoSpec {
        &self.repo
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &CacheStore<K> {
        &self.cache
    }

    /// The cached snapshot, if a valid one exists.
    ///
    /// Stored records are re-ranked with the current classifier. Entries that
    /// fail to parse or violate ordering/uniqueness are treated as absent.
    pub fn cached(&self) -> Option<Snapshot> {
        let key = self.repo.cache_key();
        match self.cache.lookup::<Vec<ContributorRecord>>(&key, Utc::now()) {
            CacheLookup::Hit(entry) => {
                if let Err(reason) = snapshot::validate(&entry.data) {
                    log::warn!(target: LOG_TARGET, "{}: ignoring invalid cache entry: {}", self.repo, reason);
                    return None;
                }
                let mut records = entry.data;
                snapshot::rank(&mut records, &self.classifier);
                log::debug!(target: LOG_TARGET, "{}: cache hit ({} contributors)", self.repo, records.len());
                Some(Snapshot::new(records, entry.timestamp, Origin::Cached))
            }
            CacheLookup::Missing => {
                log::debug!(target: LOG_TARGET, "{}: cache miss", self.repo);
                None
            }
            CacheLookup::Expired { age } => {
                log::info!(target: LOG_TARGET, "{}: cache expired ({}s old)", self.repo, age.as_secs());
                None
            }
            CacheLookup::Corrupt(reason) => {
                log::warn!(target: LOG_TARGET, "{}: ignoring unreadable cache entry: {}", self.repo, reason);
                None
            }
        }
    }

    /// Serve from cache when valid, otherwise aggregate afresh.
    pub async fn load(&self) -> Result<Snapshot> {
        match self.cached() {
            Some(snapshot) => Ok(snapshot),
            None => self.run().await,
        }
    }

    /// Fetch, enrich, rank and cache the full contributor list.
    ///
    /// A failed page fetch fails the run and leaves the cache untouched.
    /// Failed profile lookups only degrade the affected records.
    pub async fn run(&self) -> Result<Snapshot> {
        log::info!(target: LOG_TARGET, "{}: aggregating contributors", self.repo);

        let base = fetch_all(&self.source, &self.repo, self.page_size).await?;
        let enriched = enrich_all(&self.source, base, self.max_concurrent_lookups).await;

        let mut records: Vec<ContributorRecord> = enriched
            .into_iter()
            .map(|e| ContributorRecord::new(e.base, e.profile, e.status))
            .collect();
        snapshot::rank(&mut records, &self.classifier);

        let entry = CacheEntry::new(records);
        if let Err(e) = self.cache.write(&self.repo.cache_key(), &entry) {
            log::warn!(target: LOG_TARGET, "{}: could not write cache: {}", self.repo, e);
        }

        Ok(Snapshot::new(entry.data, entry.timestamp, Origin::Fresh))
    }
}
