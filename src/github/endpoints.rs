// GitHub API endpoint functions.
// Provides typed methods for the contributors listing and user profile endpoints.

use reqwest::StatusCode;

use crate::error::Result;
use crate::repo_spec::RepoSpec;

use super::client::GitHubClient;
use super::types::{ContributorEntry, UserProfile};

impl GitHubClient {
    /// Get one page of contributors for a repository, including anonymous authors.
    ///
    /// An empty repository answers 204 with no body, which is reported as an empty page.
    pub async fn get_contributors(
        &self,
        repo: &RepoSpec,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ContributorEntry>> {
        let params = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("anon", "true".to_string()),
        ];
        let response = self
            .get_with_params(
                &format!("/repos/{}/{}/contributors", repo.owner(), repo.name()),
                &params,
            )
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let entries: Vec<ContributorEntry> = serde_json::from_str(&body)?;
        Ok(entries)
    }

    /// Get the public profile of a user.
    pub async fn get_user(&self, login: &str) -> Result<UserProfile> {
        let response = self.get(&format!("/users/{}", login)).await?;
        let body = response.text().await?;
        let profile: UserProfile = serde_json::from_str(&body)?;
        Ok(profile)
    }
}
