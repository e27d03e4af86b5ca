// Contributor data model.
// Base records from the contributors listing and the enriched, ranked record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::github::{AccountType, ContributorEntry, UserProfile};

use super::role::Role;

/// Bio shown when a profile has none or could not be fetched.
pub const DEFAULT_BIO: &str = "Open source contributor";

/// Stable identity of a contributor within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// A GitHub account, keyed by its numeric id.
    User(u64),
    /// A commit author with no GitHub account, keyed by lower-cased email (or name).
    Anonymous(String),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user:{}", id),
            Identity::Anonymous(key) => write!(f, "anon:{}", key),
        }
    }
}

/// A contributor as reported by the contributors listing, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseContributor {
    pub identity: Identity,
    /// GitHub login, or the author name for anonymous contributors.
    pub login: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub contributions: u64,
}

impl BaseContributor {
    /// Login to look up a profile for; anonymous contributors have none.
    pub fn lookup_login(&self) -> Option<&str> {
        match self.identity {
            Identity::User(_) => Some(&self.login),
            Identity::Anonymous(_) => None,
        }
    }
}

impl TryFrom<ContributorEntry> for BaseContributor {
    type Error = RosterError;

    fn try_from(entry: ContributorEntry) -> Result<Self> {
        if entry.account_type == AccountType::Anonymous {
            let key = entry
                .email
                .as_deref()
                .or(entry.name.as_deref())
                .filter(|key| !key.trim().is_empty())
                .map(|key| key.trim().to_lowercase())
                .ok_or_else(|| {
                    RosterError::Other("anonymous contributor without name or email".to_string())
                })?;
            let login = entry
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| key.clone());
            return Ok(Self {
                identity: Identity::Anonymous(key),
                login,
                avatar_url: None,
                profile_url: None,
                contributions: entry.contributions,
            });
        }

        match (entry.id, entry.login) {
            (Some(id), Some(login)) if !login.is_empty() => Ok(Self {
                identity: Identity::User(id),
                login,
                avatar_url: entry.avatar_url,
                profile_url: entry.html_url,
                contributions: entry.contributions,
            }),
            _ => Err(RosterError::Other(
                "contributor entry without login or id".to_string(),
            )),
        }
    }
}

/// How a record's profile attributes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Profile lookup succeeded.
    Enriched,
    /// Profile lookup failed; attributes are defaults, not real values.
    Defaulted,
    /// No account to look up.
    Anonymous,
}

/// Profile attributes attached during enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub bio: String,
    pub followers: u64,
    pub public_repos: u64,
    pub company: Option<String>,
    pub location: Option<String>,
}

impl Profile {
    /// Attributes used when no profile is available.
    pub fn fallback(login: &str) -> Self {
        Self {
            display_name: login.to_string(),
            bio: DEFAULT_BIO.to_string(),
            followers: 0,
            public_repos: 0,
            company: None,
            location: None,
        }
    }

    /// Normalize an API profile; blank strings count as missing.
    pub fn from_user(login: &str, user: UserProfile) -> Self {
        Self {
            display_name: non_blank(user.name).unwrap_or_else(|| login.to_string()),
            bio: non_blank(user.bio).unwrap_or_else(|| DEFAULT_BIO.to_string()),
            followers: user.followers.unwrap_or(0),
            public_repos: user.public_repos.unwrap_or(0),
            company: non_blank(user.company),
            location: non_blank(user.location),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Medal for the top three positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    /// Badge for a zero-based position in the ranked list.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Badge::Gold),
            1 => Some(Badge::Silver),
            2 => Some(Badge::Bronze),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Gold => "Top Contributor",
            Badge::Silver => "Silver Contributor",
            Badge::Bronze => "Bronze Contributor",
        }
    }
}

/// A fully enriched and classified contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    pub identity: Identity,
    pub login: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    /// Commit count from the contributors listing; never altered by enrichment.
    pub contributions: u64,
    pub display_name: String,
    pub bio: String,
    pub followers: u64,
    pub public_repos: u64,
    pub company: Option<String>,
    pub location: Option<String>,
    pub role: Role,
    pub enrichment: EnrichmentStatus,
    #[serde(default)]
    pub badge: Option<Badge>,
}

impl ContributorRecord {
    /// Combine a base record with its profile. Role and badge are assigned during ranking.
    pub fn new(base: BaseContributor, profile: Profile, enrichment: EnrichmentStatus) -> Self {
        Self {
            identity: base.identity,
            login: base.login,
            avatar_url: base.avatar_url,
            profile_url: base.profile_url,
            contributions: base.contributions,
            display_name: profile.display_name,
            bio: profile.bio,
            followers: profile.followers,
            public_repos: profile.public_repos,
            company: profile.company,
            location: profile.location,
            role: Role::NewContributor,
            enrichment,
            badge: None,
        }
    }

    /// Login usable for lead matching; anonymous authors have none.
    pub fn account_login(&self) -> Option<&str> {
        match self.identity {
            Identity::User(_) => Some(&self.login),
            Identity::Anonymous(_) => None,
        }
    }

    /// Case-insensitive substring match over name, login, role, location and company.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        contains(self.display_name.as_str())
            || contains(self.login.as_str())
            || contains(self.role.label())
            || self.location.as_deref().is_some_and(contains)
            || self.company.as_deref().is_some_and(contains)
    }
}
