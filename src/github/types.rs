// GitHub API response types.
// Defines structs for deserializing the contributors and user profile endpoints.

use serde::{Deserialize, Serialize};

/// Account type discriminator on contributor entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountType {
    #[default]
    User,
    Organization,
    Bot,
    /// Commit author with no linked GitHub account (only reported with `anon=true`).
    Anonymous,
    #[serde(other)]
    Unknown,
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
///
/// Linked accounts carry `login`/`id`/`avatar_url`/`html_url`; anonymous
/// entries only carry `name` and `email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorEntry {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    pub contributions: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Subset of `GET /users/{login}` used for enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub public_repos: Option<u64>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
