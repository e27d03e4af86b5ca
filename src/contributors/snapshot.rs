// Ranked contributor snapshots.
// Ordering, badges, validation, summaries and search over an aggregated collection.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record::{Badge, ContributorRecord};
use super::role::{Role, RoleClassifier};

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Aggregated by this call.
    Fresh,
    /// Served from a valid cache entry.
    Cached,
}

/// An aggregated contributor collection in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub records: Vec<ContributorRecord>,
    /// When the collection was aggregated.
    pub timestamp: DateTime<Utc>,
    pub origin: Origin,
}

/// Headline numbers for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub contributors: usize,
    pub contributions: u64,
    pub by_role: BTreeMap<Role, usize>,
}

impl Snapshot {
    pub fn new(records: Vec<ContributorRecord>, timestamp: DateTime<Utc>, origin: Origin) -> Self {
        Self {
            records,
            timestamp,
            origin,
        }
    }

    /// Records matching `term`, in snapshot order.
    ///
    /// Matching is a case-insensitive substring test over display name, login,
    /// role, location and company. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&ContributorRecord> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let mut by_role = BTreeMap::new();
        for record in &self.records {
            *by_role.entry(record.role).or_insert(0) += 1;
        }
        Summary {
            contributors: self.records.len(),
            contributions: self.records.iter().map(|r| r.contributions).sum(),
            by_role,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Classify, order by contributions (descending, stable) and badge the top three.
pub fn rank(records: &mut [ContributorRecord], classifier: &RoleClassifier) {
    for record in records.iter_mut() {
        record.role = classifier.classify(
            record.account_login(),
            record.contributions,
            record.followers,
        );
    }

    records.sort_by(|a, b| b.contributions.cmp(&a.contributions));

    for (position, record) in records.iter_mut().enumerate() {
        record.badge = Badge::for_position(position);
    }
}

/// Check that a stored collection is unique by identity and sorted.
pub fn validate(records: &[ContributorRecord]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.identity) {
            return Err(format!("duplicate contributor {}", record.identity));
        }
    }

    if let Some(pair) = records
        .windows(2)
        .find(|pair| pair[0].contributions < pair[1].contributions)
    {
        return Err(format!(
            "'{}' ({}) is ranked above '{}' ({})",
            pair[0].login, pair[0].contributions, pair[1].login, pair[1].contributions
        ));
    }

    Ok(())
}
