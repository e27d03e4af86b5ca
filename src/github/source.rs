// Remote contributor source abstraction.
// The pipeline talks to this trait so the GitHub client can be swapped in tests.

use std::future::Future;

use crate::error::Result;
use crate::repo_spec::RepoSpec;

use super::client::GitHubClient;
use super::types::{ContributorEntry, UserProfile};

/// A remote API that lists contributors page by page and serves user profiles.
pub trait ContributorSource: Send + Sync {
    /// Fetch page `page` (1-based) of at most `per_page` contributors.
    fn contributors_page(
        &self,
        repo: &RepoSpec,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<ContributorEntry>>> + Send;

    /// Fetch the profile for `login`.
    fn user_profile(&self, login: &str) -> impl Future<Output = Result<UserProfile>> + Send;
}

impl ContributorSource for GitHubClient {
    async fn contributors_page(
        &self,
        repo: &RepoSpec,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ContributorEntry>> {
        self.get_contributors(repo, page, per_page).await
    }

    async fn user_profile(&self, login: &str) -> Result<UserProfile> {
        self.get_user(login).await
    }
}
