//! HTML parser for extracting anchors and page metadata
//!
//! Anchors are returned raw (text plus unresolved `href`); resolution and
//! classification are the caller's job so that malformed hrefs can be
//! counted and skipped individually.

use scraper::{Html, Selector};

/// A hyperlink as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Visible text, whitespace-trimmed
    pub text: String,
    /// The `href` attribute, unresolved
    pub href: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// `<a href>` elements in document order
    pub anchors: Vec<LinkRecord>,
}

/// Parses HTML content and extracts the title and anchors
///
/// Parsing is lenient; malformed markup produces a best-effort document
/// rather than an error.
///
/// # Example
///
/// ```
/// use webrecon::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.anchors[0].href, "/page");
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        anchors: extract_anchors(&document),
    }
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts every `<a href>` element in document order
pub fn extract_anchors(document: &Html) -> Vec<LinkRecord> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            element.value().attr("href").map(|href| LinkRecord {
                text: element.text().collect::<String>().trim().to_string(),
                href: href.to_string(),
            })
        })
        .collect()
}

/// Extracts the `src` attribute of every element that has one
///
/// Covers scripts, images, iframes, media, and any other embedding element.
pub fn extract_sources(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
        .collect()
}
