//! Depth-first walk collecting links within the seed's authority
//!
//! The walk keeps an explicit stack instead of recursing. For each page it
//! records the newly seen same-domain links in anchor order, then pushes them
//! so the first one is expanded next. The resulting order matches a recursive
//! descent: a page's own discoveries, followed by what each child discovers in
//! turn.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::throttle::Throttle;
use crate::crawler::visited::VisitedSet;
use crate::crawler::walk::{fetch_anchors, WalkLimits, WalkOutcome};
use crate::url::{classify, Link, LinkClass};

/// A page waiting to be expanded
#[derive(Debug)]
struct PendingPage {
    link: Link,
    depth: usize,
}

/// Depth-first same-domain link walker
#[derive(Debug)]
pub struct SameDomainWalker<'a> {
    fetcher: &'a Fetcher,
    throttle: &'a Throttle,
    limits: WalkLimits,
}

impl<'a> SameDomainWalker<'a> {
    pub fn new(fetcher: &'a Fetcher, throttle: &'a Throttle, limits: WalkLimits) -> Self {
        Self {
            fetcher,
            throttle,
            limits,
        }
    }

    /// Walks the seed's own pages
    ///
    /// Pages deeper than `max_depth` are recorded but never fetched, and at
    /// most `max_pages` pages are fetched in total. In-page anchors (`#top`)
    /// point at a page already seen and are not recorded again.
    pub async fn walk(&self, seed: impl Into<Link>, visited: &mut VisitedSet) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let seed = seed.into().without_fragment();
        let seed_authority = seed.authority().clone();

        visited.mark(seed.as_str());
        let mut stack = vec![PendingPage {
            link: seed.clone(),
            depth: 0,
        }];

        while let Some(node) = stack.pop() {
            if outcome.stats.pages >= self.limits.max_pages {
                tracing::warn!(
                    "Page limit of {} reached, {} pending pages left unvisited",
                    self.limits.max_pages,
                    stack.len() + 1
                );
                outcome.stats.truncated = true;
                break;
            }

            self.throttle.pace().await;
            tracing::info!("Scraping page links from {}", node.link);

            let Some(anchors) =
                fetch_anchors(self.fetcher, node.link.url(), &mut outcome.stats).await
            else {
                continue;
            };

            let mut discovered = Vec::new();
            for anchor in anchors {
                let link = match node.link.resolve(&anchor.href) {
                    Ok(link) => link.without_fragment(),
                    Err(e) => {
                        tracing::debug!("Ignoring href on {}: {}", node.link, e);
                        outcome.stats.malformed += 1;
                        continue;
                    }
                };

                if classify(&link, &seed_authority) == LinkClass::SameDomain
                    && visited.mark(link.as_str())
                {
                    tracing::debug!("Found page link {}", link);
                    outcome.links.push(link.to_string());
                    discovered.push(link);
                }
            }

            if node.depth >= self.limits.max_depth {
                if !discovered.is_empty() {
                    tracing::debug!(
                        "Depth limit {} reached at {}, not expanding {} links",
                        self.limits.max_depth,
                        node.link,
                        discovered.len()
                    );
                    outcome.stats.truncated = true;
                }
                continue;
            }

            // Reversed so the first discovered link is popped first
            stack.extend(discovered.into_iter().rev().map(|link| PendingPage {
                link,
                depth: node.depth + 1,
            }));
        }

        tracing::info!(
            "Same-domain walk from {} found {} links ({} pages, {} failed)",
            seed,
            outcome.links.len(),
            outcome.stats.pages,
            outcome.stats.failed
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{test_fetcher, StaticTransport};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    fn seed() -> Url {
        Url::parse("https://a.test/").unwrap()
    }

    async fn run(transport: Arc<StaticTransport>, limits: WalkLimits) -> WalkOutcome {
        let fetcher = test_fetcher(transport);
        let throttle = Throttle::new(Duration::ZERO);
        let mut visited = VisitedSet::new();
        SameDomainWalker::new(&fetcher, &throttle, limits)
            .walk(&seed(), &mut visited)
            .await
    }

    fn tree() -> Arc<StaticTransport> {
        Arc::new(
            StaticTransport::new()
                .page(
                    "https://a.test/",
                    r#"<a href="/a">a</a><a href="/b">b</a><a href="https://x.test/">x</a>"#,
                )
                .page("https://a.test/a", r#"<a href="/a1">a1</a><a href="/">home</a>"#)
                .page("https://a.test/a1", r#"<a href="/b">b</a>"#)
                .page("https://a.test/b", r#"<a href="b1">b1</a>"#)
                .page("https://a.test/b1", "<p>leaf</p>"),
        )
    }

    #[tokio::test]
    async fn test_scenario_records_internal_page() {
        let transport = Arc::new(
            StaticTransport::new()
                .page(
                    "https://a.test/",
                    r#"<a href="/page2">p2</a><a href="https://b.test/ext">b</a>"#,
                )
                .page(
                    "https://a.test/page2",
                    r#"<a href="/">home</a><a href="https://c.test/ext2">c</a>"#,
                ),
        );
        let outcome = run(transport.clone(), WalkLimits::default()).await;

        assert_eq!(outcome.links, vec!["https://a.test/page2"]);
        assert_eq!(transport.count("https://b.test/ext"), 0);
        assert_eq!(transport.count("https://c.test/ext2"), 0);
    }

    #[tokio::test]
    async fn test_depth_first_order() {
        let transport = tree();
        let outcome = run(transport.clone(), WalkLimits::default()).await;

        assert_eq!(
            outcome.links,
            vec![
                "https://a.test/a",
                "https://a.test/b",
                "https://a.test/a1",
                "https://a.test/b1",
            ]
        );
        assert_eq!(
            transport.calls(),
            vec![
                "https://a.test/",
                "https://a.test/a",
                "https://a.test/a1",
                "https://a.test/b",
                "https://a.test/b1",
            ]
        );
    }

    #[tokio::test]
    async fn test_each_page_fetched_once() {
        let transport = tree();
        run(transport.clone(), WalkLimits::default()).await;

        for url in transport.calls() {
            assert_eq!(transport.count(&url), 1, "{url} fetched more than once");
        }
    }

    #[tokio::test]
    async fn test_depth_limit_records_but_does_not_expand() {
        let transport = tree();
        let limits = WalkLimits {
            max_pages: 100,
            max_depth: 0,
        };
        let outcome = run(transport.clone(), limits).await;

        assert_eq!(outcome.links, vec!["https://a.test/a", "https://a.test/b"]);
        assert_eq!(transport.calls(), vec!["https://a.test/"]);
        assert!(outcome.stats.truncated);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let transport = tree();
        let limits = WalkLimits {
            max_pages: 2,
            max_depth: 16,
        };
        let outcome = run(transport.clone(), limits).await;

        assert_eq!(transport.calls().len(), 2);
        assert_eq!(
            outcome.links,
            vec!["https://a.test/a", "https://a.test/b", "https://a.test/a1"]
        );
        assert!(outcome.stats.truncated);
    }

    #[tokio::test]
    async fn test_failed_seed_yields_nothing() {
        let transport = Arc::new(StaticTransport::new());
        let outcome = run(transport, WalkLimits::default()).await;

        assert!(outcome.links.is_empty());
        assert_eq!(outcome.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_in_page_anchors_are_not_new_pages() {
        let transport = Arc::new(
            StaticTransport::new()
                .page(
                    "https://a.test/",
                    r##"<a href="#main">skip</a><a href="/p">p</a>"##,
                )
                .page(
                    "https://a.test/p",
                    r##"<a href="/p#top">top</a><a href="/#footer">home</a>"##,
                ),
        );
        let outcome = run(transport.clone(), WalkLimits::default()).await;

        assert_eq!(outcome.links, vec!["https://a.test/p"]);
        assert_eq!(transport.calls(), vec!["https://a.test/", "https://a.test/p"]);
    }

    #[tokio::test]
    async fn test_authority_written_differently_is_not_internal() {
        let transport = Arc::new(StaticTransport::new().page(
            "https://a.test/",
            r#"<a href="https://A.test/shout">s</a><a href="https://a.test:443/port">p</a><a href="/ok">ok</a>"#,
        ));
        let outcome = run(transport, WalkLimits::default()).await;

        assert_eq!(outcome.links, vec!["https://a.test/ok"]);
    }
}
