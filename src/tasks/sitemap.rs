use crate::crawler::Fetcher;
use crate::tasks::fetch_document;
use scraper::{Html, Selector};
use url::Url;

/// `/sitemap.xml` at the seed's authority
pub fn sitemap_url(seed: &Url) -> Option<Url> {
    seed.join("/sitemap.xml").ok()
}

/// Text of every `<loc>` element, in document order
///
/// Works for both url sets and sitemap indexes; nested sitemaps are listed,
/// not followed.
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("loc") else {
        return Vec::new();
    };

    Html::parse_document(xml)
        .select(&selector)
        .map(|loc| loc.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

pub async fn collect_sitemap_urls(fetcher: &Fetcher, seed: &Url) -> Vec<String> {
    let Some(location) = sitemap_url(seed) else {
        return Vec::new();
    };

    match fetch_document(fetcher, location.as_str()).await {
        Some(page) => parse_sitemap(&page.text()),
        None => Vec::new(),
    }
}
