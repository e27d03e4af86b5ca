//! Contributor roster for a GitHub repository.
//!
//! Fetches the full contributor list page by page, enriches each contributor
//! with profile data, assigns a role, ranks by contribution count and caches
//! the result for an hour.

pub mod cache;
pub mod config;
pub mod contributors;
pub mod error;
pub mod github;
pub mod repo_spec;

pub use config::RosterConfig;
pub use contributors::{ContributorRecord, Role, Roster, Snapshot};
pub use error::{Result, RosterError};
pub use repo_spec::RepoSpec;
