// Profile enrichment.
// Looks up every contributor's profile concurrently; failures degrade to defaults.

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::github::ContributorSource;

use super::record::{BaseContributor, EnrichmentStatus, Profile};

const LOG_TARGET: &str = "roster::enrich";

/// A base contributor with the profile attached to it.
#[derive(Debug, Clone)]
pub struct Enriched {
    pub base: BaseContributor,
    pub profile: Profile,
    pub status: EnrichmentStatus,
}

/// Fetch profiles for all `contributors`, at most `max_concurrent` at a time.
///
/// The output has the same length and order as the input. A failed lookup
/// never aborts the batch; that contributor gets [`Profile::fallback`] and
/// [`EnrichmentStatus::Defaulted`].
pub async fn enrich_all<S: ContributorSource>(
    source: &S,
    contributors: Vec<BaseContributor>,
    max_concurrent: usize,
) -> Vec<Enriched> {
    let semaphore = Semaphore::new(max_concurrent.max(1));
    let semaphore = &semaphore;

    let lookups = contributors.into_iter().map(|base| async move {
        let Some(login) = base.lookup_login().map(str::to_string) else {
            let profile = Profile::fallback(&base.login);
            return Enriched {
                base,
                profile,
                status: EnrichmentStatus::Anonymous,
            };
        };

        // The semaphore is never closed, so a permit is always granted.
        let _permit = semaphore.acquire().await.ok();
        match source.user_profile(&login).await {
            Ok(user) => {
                let profile = Profile::from_user(&login, user);
                Enriched {
                    base,
                    profile,
                    status: EnrichmentStatus::Enriched,
                }
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Profile lookup for '{}' failed, using defaults: {}", login, e);
                let profile = Profile::fallback(&login);
                Enriched {
                    base,
                    profile,
                    status: EnrichmentStatus::Defaulted,
                }
            }
        }
    });

    let enriched = join_all(lookups).await;

    let defaulted = enriched
        .iter()
        .filter(|e| e.status == EnrichmentStatus::Defaulted)
        .count();
    if defaulted > 0 {
        log::warn!(target: LOG_TARGET, "{} of {} profile lookups failed", defaulted, enriched.len());
    }

    enriched
}
