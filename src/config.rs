// Runtime configuration.
// Collects repository, credentials, pagination and cache settings for a roster.

use std::path::PathBuf;
use std::time::Duration;

use crate::repo_spec::RepoSpec;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Largest page size the contributors endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How long an aggregated snapshot stays valid: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default bound on in-flight profile lookups.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Configuration for fetching and caching one repository's contributors.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Repository whose contributors are listed.
    pub repo: RepoSpec,
    /// Optional bearer token; without one the unauthenticated rate limit applies.
    pub token: Option<String>,
    /// API base URL (overridable for tests and GitHub Enterprise).
    pub api_base: String,
    /// Contributors requested per page.
    pub page_size: u32,
    /// Maximum age of a cached snapshot.
    pub ttl: Duration,
    /// Upper bound on concurrent profile lookups.
    pub max_concurrent_lookups: usize,
    /// Login that is always classified as project lead (defaults to the repo owner).
    pub project_lead: Option<String>,
    /// Directory for the on-disk cache (defaults to the platform cache dir).
    pub cache_dir: Option<PathBuf>,
}

impl RosterConfig {
    pub fn new(repo: RepoSpec) -> Self {
        Self {
            repo,
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: MAX_PAGE_SIZE,
            ttl: DEFAULT_TTL,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            project_lead: None,
            cache_dir: None,
        }
    }

    /// Build a configuration, picking up `GITHUB_TOKEN` and `ROSTER_API_BASE` from the environment.
    pub fn from_env(repo: RepoSpec) -> Self {
        let mut config = Self::new(repo);
        config.token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        if let Ok(base) = std::env::var("ROSTER_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base = base;
            }
        }
        config
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the page size, clamped to what the API accepts.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_concurrent_lookups(mut self, max: usize) -> Self {
        self.max_concurrent_lookups = max.max(1);
        self
    }

    pub fn with_project_lead(mut self, login: Option<String>) -> Self {
        self.project_lead = login;
        self
    }

    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cache_dir = dir;
        self
    }

    /// Login classified as project lead.
    pub fn project_lead(&self) -> &str {
        self.project_lead
            .as_deref()
            .unwrap_or_else(|| self.repo.owner())
    }
}
