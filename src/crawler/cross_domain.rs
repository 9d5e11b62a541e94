//! Breadth-first walk collecting links that leave the seed's authority
//!
//! Starting from the seed page, every fetched page's anchors are resolved
//! against that page and classified. Each newly seen cross-domain link is
//! recorded and queued, so the walk keeps expanding through external sites.
//! Same-domain links are ignored unless `follow_internal` is set, in which
//! case they are queued (but not recorded) so cross-domain links reachable
//! only through internal pages are found too.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::throttle::Throttle;
use crate::crawler::visited::VisitedSet;
use crate::crawler::walk::{fetch_anchors, WalkLimits, WalkOutcome};
use crate::url::{classify, Link, LinkClass};
use std::collections::VecDeque;

/// Breadth-first cross-domain link walker
#[derive(Debug)]
pub struct CrossDomainWalker<'a> {
    fetcher: &'a Fetcher,
    throttle: &'a Throttle,
    limits: WalkLimits,
    follow_internal: bool,
}

impl<'a> CrossDomainWalker<'a> {
    pub fn new(fetcher: &'a Fetcher, throttle: &'a Throttle, limits: WalkLimits) -> Self {
        Self {
            fetcher,
            throttle,
            limits,
            follow_internal: false,
        }
    }

    /// Also traverse same-domain pages (without recording them)
    pub fn follow_internal(mut self, follow: bool) -> Self {
        self.follow_internal = follow;
        self
    }

    /// Walks outward from `seed`
    ///
    /// The seed is marked visited before the walk starts. Every link in the
    /// outcome was marked in `visited` at the moment it was discovered, so no
    /// URL is recorded or fetched twice. Fragments are dropped before marking,
    /// since `/p#top` is the same document as `/p`.
    pub async fn walk(&self, seed: impl Into<Link>, visited: &mut VisitedSet) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let seed = seed.into().without_fragment();
        let seed_authority = seed.authority().clone();

        visited.mark(seed.as_str());
        let mut frontier = VecDeque::from([seed.clone()]);

        while let Some(current) = frontier.pop_front() {
            if outcome.stats.pages >= self.limits.max_pages {
                tracing::warn!(
                    "Page limit of {} reached, {} queued links left unvisited",
                    self.limits.max_pages,
                    frontier.len() + 1
                );
                outcome.stats.truncated = true;
                break;
            }

            self.throttle.pace().await;
            tracing::info!("Scraping cross-domain links from {}", current);

            let Some(anchors) =
                fetch_anchors(self.fetcher, current.url(), &mut outcome.stats).await
            else {
                continue;
            };

            for anchor in anchors {
                let link = match current.resolve(&anchor.href) {
                    Ok(link) => link.without_fragment(),
                    Err(e) => {
                        tracing::debug!("Ignoring href on {}: {}", current, e);
                        outcome.stats.malformed += 1;
                        continue;
                    }
                };

                match classify(&link, &seed_authority) {
                    LinkClass::CrossDomain => {
                        if visited.mark(link.as_str()) {
                            tracing::debug!("Found cross-domain link {}", link);
                            outcome.links.push(link.to_string());
                            frontier.push_back(link);
                        }
                    }
                    LinkClass::SameDomain if self.follow_internal => {
                        if visited.mark(link.as_str()) {
                            frontier.push_back(link);
                        }
                    }
                    LinkClass::SameDomain | LinkClass::Excluded => {}
                }
            }
        }

        tracing::info!(
            "Cross-domain walk from {} found {} links ({} pages, {} failed)",
            seed,
            outcome.links.len(),
            outcome.stats.pages,
            outcome.stats.failed
        );

        outcome
    }
}
