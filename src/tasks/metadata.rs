use crate::crawler::{extract_title, Fetcher};
use crate::tasks::fetch_document;
use scraper::{Html, Selector};

pub const NO_TITLE: &str = "No title";
pub const NO_DESCRIPTION: &str = "No description";

/// Title and description of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            title: NO_TITLE.to_string(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

/// Reads `<title>` and `<meta name="description">`, with placeholder defaults
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let defaults = PageMetadata::default();

    let description = Selector::parse("meta[name]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .filter(|meta| {
                    meta.value()
                        .attr("name")
                        .is_some_and(|name| name.eq_ignore_ascii_case("description"))
                })
                .find_map(|meta| meta.value().attr("content"))
                .map(|content| content.trim().to_string())
        })
        .filter(|content| !content.is_empty())
        .unwrap_or(defaults.description);

    PageMetadata {
        title: extract_title(&document).unwrap_or(defaults.title),
        description,
    }
}

pub async fn collect_metadata(fetcher: &Fetcher, url: &str) -> PageMetadata {
    match fetch_document(fetcher, url).await {
        Some(page) => extract_metadata(&page.text()),
        None => PageMetadata::default(),
    }
}
