// Query layer.
// Read-through access to the aggregated roster, search, and loading state.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::cache::{FileStore, KvStore, MemoryStore, cache_dir};
use crate::config::RosterConfig;
use crate::error::{Result, RosterError};
use crate::github::{ContributorSource, GitHubClient};

use super::aggregate::Aggregator;
use super::record::ContributorRecord;
use super::snapshot::Snapshot;

const LOG_TARGET: &str = "roster::query";

/// Progress of the first load in a session.
///
/// `Idle` counts as loading: nothing has been served yet. A failed first load
/// ends in `Error`; once `Loaded`, later refreshes never leave that state.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Idle | LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    /// Data of the last successful load, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Contributor roster for one repository.
///
/// `get` serves the cached snapshot while it is valid and aggregates on a miss.
/// Concurrent misses are coalesced: one caller aggregates, the others wait and
/// then read what it cached.
#[derive(Debug)]
pub struct Roster<S, K> {
    aggregator: Aggregator<S, K>,
    refresh_gate: Mutex<()>,
    state: RwLock<LoadingState<Arc<Snapshot>>>,
}

impl Roster<GitHubClient, Box<dyn KvStore>> {
    /// Build a roster talking to GitHub, cached on disk.
    ///
    /// Falls back to an in-memory cache when no cache directory is available.
    pub fn from_config(config: &RosterConfig) -> Result<Self> {
        let client = GitHubClient::new(config.token.as_deref(), &config.api_base)?;
        let backend: Box<dyn KvStore> = match config.cache_dir.clone().or_else(cache_dir) {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => {
                log::warn!(target: LOG_TARGET, "No cache directory available, caching in memory only");
                Box::new(MemoryStore::new())
            }
        };
        Ok(Self::new(Aggregator::new(client, backend, config)))
    }
}

impl<S: ContributorSource, K: KvStore> Roster<S, K> {
    pub fn new(aggregator: Aggregator<S, K>) -> Self {
        Self {
            aggregator,
            refresh_gate: Mutex::new(()),
            state: RwLock::new(LoadingState::Idle),
        }
    }

    pub fn aggregator(&self) -> &Aggregator<S, K> {
        &self.aggregator
    }

    /// The current snapshot: cached if valid, otherwise freshly aggregated.
    ///
    /// On failure nothing is cached and the error is returned; a previously
    /// stored entry stays in place.
    pub async fn get(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.aggregator.cached() {
            return Ok(self.loaded(snapshot));
        }

        self.begin_loading();
        let _gate = self.refresh_gate.lock().await;

        // Another caller may have aggregated while we waited for the gate.
        if let Some(snapshot) = self.aggregator.cached() {
            return Ok(self.loaded(snapshot));
        }

        self.finish(self.aggregator.run().await)
    }

    /// Aggregate afresh regardless of the cache, committing the result on success.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.begin_loading();
        let _gate = self.refresh_gate.lock().await;
        self.finish(self.aggregator.run().await)
    }

    /// Records matching `term` (see [`Snapshot::search`]), in ranked order.
    pub async fn search(&self, term: &str) -> Result<Vec<ContributorRecord>> {
        let snapshot = self.get().await?;
        Ok(snapshot.search(term).into_iter().cloned().collect())
    }

    /// Whether the first load of this session is still pending.
    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading()
    }

    pub fn state(&self) -> LoadingState<Arc<Snapshot>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The snapshot served most recently by this roster, without touching the cache.
    pub fn last_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data()
            .cloned()
    }

    fn begin_loading(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // A loaded roster keeps showing its data while refreshing.
        if !state.is_loaded() {
            *state = LoadingState::Loading;
        }
    }

    fn loaded(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
            LoadingState::Loaded(Arc::clone(&snapshot));
        snapshot
    }

    fn finish(&self, result: Result<Snapshot>) -> Result<Arc<Snapshot>> {
        match result {
            Ok(snapshot) => Ok(self.loaded(snapshot)),
            Err(e) => {
                match std::error::Error::source(&e) {
                    Some(cause) => log::error!(target: LOG_TARGET, "{}: no contributor data available: {}: {}", self.aggregator.repo(), e, cause),
                    None => log::error!(target: LOG_TARGET, "{}: no contributor data available: {}", self.aggregator.repo(), e),
                }
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn fail(&self, error: &RosterError) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.is_loaded() {
            *state = LoadingState::Error(error.to_string());
        }
    }
}
