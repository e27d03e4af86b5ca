// Contributor page fetching.
// Streams contributor pages until a short or empty page, then deduplicates the result.

use std::collections::HashSet;

use futures::{Stream, StreamExt, stream};

use crate::error::{Result, RosterError};
use crate::github::ContributorSource;
use crate::repo_spec::RepoSpec;

use super::record::BaseContributor;

const LOG_TARGET: &str = "roster::pages";

/// One page of contributors.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub contributors: Vec<BaseContributor>,
}

enum Cursor {
    Next(u32),
    Done,
}

/// Lazily request contributor pages, one at a time, starting at page 1.
///
/// A page shorter than `per_page` (including an empty one) ends the stream.
/// A failed page is yielded as an error and also ends it. Each call starts a
/// fresh sequence.
pub fn contributor_pages<'a, S: ContributorSource>(
    source: &'a S,
    repo: &'a RepoSpec,
    per_page: u32,
) -> impl Stream<Item = Result<Page>> + 'a {
    stream::unfold(Cursor::Next(1), move |cursor| async move {
        let Cursor::Next(number) = cursor else {
            return None;
        };

        let fetched = source
            .contributors_page(repo, number, per_page)
            .await
            .and_then(|entries| {
                let full = entries.len() >= per_page as usize;
                let contributors = entries
                    .into_iter()
                    .map(BaseContributor::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok((contributors, full))
            });

        match fetched {
            Ok((contributors, full)) => {
                log::debug!(target: LOG_TARGET, "{}: page {} returned {} contributors", repo, number, contributors.len());
                let next = if full { Cursor::Next(number + 1) } else { Cursor::Done };
                Some((Ok(Page { number, contributors }), next))
            }
            Err(e) => {
                let error = RosterError::PageFetch {
                    page: number,
                    source: Box::new(e),
                };
                Some((Err(error), Cursor::Done))
            }
        }
    })
}

/// Fetch every contributor of `repo`, in listing order, without duplicates.
///
/// Any failed page fails the whole fetch; a partial list is never returned.
pub async fn fetch_all<S: ContributorSource>(
    source: &S,
    repo: &RepoSpec,
    per_page: u32,
) -> Result<Vec<BaseContributor>> {
    let mut pages = std::pin::pin!(contributor_pages(source, repo, per_page));
    let mut seen = HashSet::new();
    let mut contributors = Vec::new();
    let mut page_count = 0u32;

    while let Some(page) = pages.next().await {
        let page = page?;
        page_count += 1;
        for contributor in page.contributors {
            if seen.insert(contributor.identity.clone()) {
                contributors.push(contributor);
            } else {
                log::debug!(target: LOG_TARGET, "{}: dropping duplicate contributor {} on page {}", repo, contributor.identity, page.number);
            }
        }
    }

    log::info!(target: LOG_TARGET, "{}: fetched {} contributors in {} page(s)", repo, contributors.len(), page_count);
    Ok(contributors)
}
