// Role classification.
// Maps contribution and follower counts to a display role.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display role derived from activity metrics.
///
/// Variants are ordered by seniority, most senior first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Project Lead")]
    ProjectLead,
    #[serde(rename = "Core Maintainer")]
    CoreMaintainer,
    #[serde(rename = "Senior Dev")]
    SeniorDev,
    #[serde(rename = "Active Contributor")]
    ActiveContributor,
    #[serde(rename = "Regular Contributor")]
    RegularContributor,
    #[serde(rename = "New Contributor")]
    NewContributor,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::ProjectLead,
        Role::CoreMaintainer,
        Role::SeniorDev,
        Role::ActiveContributor,
        Role::RegularContributor,
        Role::NewContributor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Role::ProjectLead => "Project Lead",
            Role::CoreMaintainer => "Core Maintainer",
            Role::SeniorDev => "Senior Dev",
            Role::ActiveContributor => "Active Contributor",
            Role::RegularContributor => "Regular Contributor",
            Role::NewContributor => "New Contributor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assigns roles, with one login pinned as project lead.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    project_lead: String,
}

impl RoleClassifier {
    pub fn new(project_lead: impl Into<String>) -> Self {
        Self {
            project_lead: project_lead.into(),
        }
    }

    /// Classify a contributor. `login` is `None` for anonymous authors, who can never be lead.
    ///
    /// Rules are checked in order and the first match wins.
    pub fn classify(&self, login: Option<&str>, contributions: u64, followers: u64) -> Role {
        if login.is_some_and(|login| login.eq_ignore_ascii_case(&self.project_lead)) {
            return Role::ProjectLead;
        }

        match (contributions, followers) {
            (c, f) if c > 100 && f > 50 => Role::CoreMaintainer,
            (c, f) if c > 50 && f > 20 => Role::SeniorDev,
            (c, _) if c > 20 => Role::ActiveContributor,
            (c, _) if c > 10 => Role::RegularContributor,
            _ => Role::NewContributor,
        }
    }
}
