// Contributor pipeline.
// Page fetching, profile enrichment, role classification, aggregation and querying.

pub mod aggregate;
pub mod enrich;
pub mod pages;
pub mod query;
pub mod record;
pub mod role;
pub mod snapshot;

pub use aggregate::Aggregator;
pub use query::{LoadingState, Roster};
pub use record::{Badge, ContributorRecord, EnrichmentStatus, Identity};
pub use role::{Role, RoleClassifier};
pub use snapshot::{Origin, Snapshot, Summary};
