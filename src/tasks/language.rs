//! Page language detection

use crate::crawler::{FetchedPage, Fetcher};
use crate::tasks::fetch_document;
use scraper::{Html, Selector};

/// Reported when no language can be determined
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Decides which natural language a page is written in
pub trait LanguageDetector: Send + Sync {
    /// Primary language subtag (`"en"`, `"fr"`...) or `None`
    fn detect(&self, page: &FetchedPage) -> Option<String>;
}

/// Reads the language declared by the page itself
///
/// Sources, in order: `<html lang>`, `<meta http-equiv="content-language">`,
/// then the `Content-Language` response header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupLanguageDetector;

impl LanguageDetector for MarkupLanguageDetector {
    fn detect(&self, page: &FetchedPage) -> Option<String> {
        let document = Html::parse_document(&page.text());

        let html_lang = document.root_element().value().attr("lang").map(str::to_string);

        let meta_lang = || {
            let selector = Selector::parse("meta[http-equiv]").ok()?;
            document
                .select(&selector)
                .filter(|m| {
                    m.value()
                        .attr("http-equiv")
                        .is_some_and(|v| v.eq_ignore_ascii_case("content-language"))
                })
                .find_map(|m| m.value().attr("content"))
                .map(str::to_string)
        };

        html_lang
            .and_then(|tag| primary_subtag(&tag))
            .or_else(|| meta_lang().and_then(|tag| primary_subtag(&tag)))
            .or_else(|| {
                page.header("content-language")
                    .and_then(primary_subtag)
            })
    }
}

/// `"en-US"` becomes `"en"`; the first entry of a list is used
fn primary_subtag(tag: &str) -> Option<String> {
    let first = tag.split(',').next()?.trim();
    let primary = first.split(['-', '_']).next()?.trim().to_ascii_lowercase();

    if primary.is_empty() || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(primary)
}

pub async fn collect_language(fetcher: &Fetcher, detector: &dyn LanguageDetector, url: &str) -> String {
    fetch_document(fetcher, url)
        .await
        .and_then(|page| detector.detect(&page))
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}
