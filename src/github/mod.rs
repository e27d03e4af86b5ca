// GitHub API module.
// Provides the HTTP client, wire types and the contributor source seam.

pub mod client;
pub mod endpoints;
pub mod source;
pub mod types;

pub use client::GitHubClient;
pub use source::ContributorSource;
pub use types::*;
