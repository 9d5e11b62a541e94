use crate::crawler::{extract_sources, Fetcher};
use crate::tasks::fetch_document;
use scraper::Html;

/// Every `src` value on the page, unresolved, in document order
pub async fn collect_embedded_links(fetcher: &Fetcher, url: &str) -> Vec<String> {
    let Some(page) = fetch_document(fetcher, url).await else {
        return Vec::new();
    };

    let document = Html::parse_document(&page.text());
    extract_sources(&document)
}
