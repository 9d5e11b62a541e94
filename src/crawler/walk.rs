//! Pieces shared by the cross-domain and same-domain walks

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::{parse_html, LinkRecord};
use url::Url;

/// Bounds on how much of a site one walk may fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Maximum number of pages fetched (successfully or not)
    pub max_pages: usize,
    /// Deepest level whose pages are expanded; the seed is depth 0
    pub max_depth: usize,
}

impl WalkLimits {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            max_depth: config.max_depth,
        }
    }
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Counters collected during a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Pages requested
    pub pages: usize,
    /// Pages whose fetch failed after all attempts
    pub failed: usize,
    /// Pages that answered with an empty body
    pub empty: usize,
    /// Hrefs that could not be resolved
    pub malformed: usize,
    /// A page or depth cap stopped the walk early
    pub truncated: bool,
}

/// Links discovered by a walk, in discovery order, plus its counters
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub links: Vec<String>,
    pub stats: WalkStats,
}

/// Fetches one page and returns its anchors
///
/// Failed and empty pages are logged, counted, and yield `None`; the walk
/// moves on to its next entry.
pub(crate) async fn fetch_anchors(
    fetcher: &Fetcher,
    url: &Url,
    stats: &mut WalkStats,
) -> Option<Vec<LinkRecord>> {
    stats.pages += 1;

    let page = match fetcher.fetch(url.as_str()).await {
        FetchResult::Success(page) => page,
        FetchResult::Failure(failure) => {
            tracing::error!("Skipping {}: {}", url, failure.error);
            stats.failed += 1;
            return None;
        }
    };

    match page.html() {
        Ok(html) => Some(parse_html(&html).anchors),
        Err(e) => {
            tracing::warn!("Skipping {}: {}", url, e);
            stats.empty += 1;
            None
        }
    }
}
