//! Broken link checking for the anchors of one page

use crate::crawler::{extract_anchors, FetchResult, Fetcher};
use crate::tasks::fetch_document;
use crate::url::resolve;
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// A link that failed to load or did not answer 200
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub url: String,
    pub status_code: Option<u16>,
    pub reason: String,
}

/// Checks every distinct http(s) link on `page_url`
///
/// Links are fetched with at most `concurrency` requests in flight. The
/// result keeps the order in which links appear on the page.
pub async fn check_links(fetcher: &Fetcher, page_url: &Url, concurrency: usize) -> Vec<BrokenLink> {
    let Some(page) = fetch_document(fetcher, page_url.as_str()).await else {
        return Vec::new();
    };

    let document = Html::parse_document(&page.text());
    let mut seen = HashSet::new();
    let links: Vec<Url> = extract_anchors(&document)
        .into_iter()
        .filter_map(|anchor| resolve(page_url, &anchor.href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| seen.insert(url.to_string()))
        .collect();

    tracing::info!("Checking {} links found on {}", links.len(), page_url);

    let mut checked: Vec<(usize, Option<BrokenLink>)> = stream::iter(links.into_iter().enumerate())
        .map(|(index, link)| async move {
            let verdict = match fetcher.fetch(link.as_str()).await {
                FetchResult::Success(page) if page.status_code == 200 => None,
                FetchResult::Success(page) => Some(BrokenLink {
                    url: link.to_string(),
                    status_code: Some(page.status_code),
                    reason: format!("HTTP {}", page.status_code),
                }),
                FetchResult::Failure(failure) => Some(BrokenLink {
                    url: link.to_string(),
                    status_code: failure.status_code,
                    reason: failure.error.to_string(),
                }),
            };
            (index, verdict)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    checked.sort_by_key(|(index, _)| *index);
    checked.into_iter().filter_map(|(_, broken)| broken).collect()
}
