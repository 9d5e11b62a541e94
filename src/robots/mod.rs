//! Robots.txt retrieval and reporting
//!
//! The seed's robots.txt is fetched and reported on, never enforced: walks do
//! not consult it.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::{FetchResult, Fetcher};
use url::Url;

/// Agent token used when asking whether the seed may be crawled
pub const REPORT_AGENT: &str = "webrecon";

/// Group whose `Crawl-delay` is reported
pub const WILDCARD_AGENT: &str = "*";

/// Text reported when robots.txt is missing or unreadable
pub const NOT_FOUND: &str = "No robots.txt found";

/// What the seed's robots.txt says
#[derive(Debug, Clone, PartialEq)]
pub struct RobotsReport {
    /// Location that was requested
    pub url: String,
    /// Raw file content, when it was retrieved with a 2xx status
    pub content: Option<String>,
    /// `Crawl-delay` applying to generic agents, in seconds
    pub crawl_delay: Option<f64>,
    pub sitemaps: Vec<String>,
    /// Whether a generic agent may fetch the seed URL
    pub seed_allowed: Option<bool>,
}

impl RobotsReport {
    fn not_found(url: String) -> Self {
        Self {
            url,
            content: None,
            crawl_delay: None,
            sitemaps: Vec::new(),
            seed_allowed: None,
        }
    }

    pub fn found(&self) -> bool {
        self.content.is_some()
    }

    /// Raw content, or the not-found marker
    pub fn display_text(&self) -> &str {
        self.content.as_deref().unwrap_or(NOT_FOUND)
    }
}

/// `/robots.txt` at the seed's authority
pub fn robots_url(seed: &Url) -> Option<Url> {
    seed.join("/robots.txt").ok()
}

/// Fetches and summarizes the seed's robots.txt
///
/// Any failure (network, non-2xx status, empty body) yields a report with no
/// content rather than an error.
pub async fn fetch_robots(fetcher: &Fetcher, seed: &Url) -> RobotsReport {
    let Some(location) = robots_url(seed) else {
        return RobotsReport::not_found(seed.to_string());
    };

    let page = match fetcher.fetch(location.as_str()).await {
        FetchResult::Success(page) if page.is_ok() && !page.body.is_empty() => page,
        FetchResult::Success(page) => {
            tracing::info!("No robots.txt at {} (HTTP {})", location, page.status_code);
            return RobotsReport::not_found(location.to_string());
        }
        FetchResult::Failure(failure) => {
            tracing::info!("Could not retrieve {}: {}", location, failure.error);
            return RobotsReport::not_found(location.to_string());
        }
    };

    let content = page.text();
    let parsed = ParsedRobots::from_content(&content);

    RobotsReport {
        url: location.to_string(),
        crawl_delay: parsed.crawl_delay(WILDCARD_AGENT),
        sitemaps: parsed.sitemaps().to_vec(),
        seed_allowed: Some(parsed.is_allowed(seed.as_str(), REPORT_AGENT)),
        content: Some(content),
    }
}
