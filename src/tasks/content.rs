//! Structural content analysis of a single page

use crate::crawler::{extract_anchors, Fetcher, LinkRecord};
use crate::tasks::fetch_document;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Header and data cells of one `<table>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    pub src: Option<String>,
    /// Inline body, if any
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: Option<String>,
    pub field_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    pub action: Option<String>,
    pub method: Option<String>,
    pub inputs: Vec<FormField>,
}

/// Everything the content analysis task reports about a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentAnalysis {
    /// `h1` through `h6` texts, indexed by level - 1
    pub headings: [Vec<String>; 6],
    /// All paragraph text joined by single spaces
    pub main_content: String,
    pub unordered_items: Vec<String>,
    pub ordered_items: Vec<String>,
    pub blockquotes: Vec<String>,
    pub tables: Vec<TableSummary>,
    pub links: Vec<LinkRecord>,
    pub images: Vec<ImageRef>,
    /// `(name | property | "unknown", content)`, one entry per key, last value wins
    pub meta_tags: Vec<(String, String)>,
    pub scripts: Vec<ScriptRef>,
    pub forms: Vec<FormSummary>,
    pub iframes: Vec<String>,
    pub comments: Vec<String>,
    /// Found in `main_content`, first-seen order, no duplicates
    pub email_addresses: Vec<String>,
    pub phone_numbers: Vec<String>,
}

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").ok())
        .as_ref()
}

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\+?\d[\d\s-]{7,}\d").ok())
        .as_ref()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

/// Runs `f` over every element matching `css` under `scope`
fn select_map<'a, T>(
    scope: ElementRef<'a>,
    css: &str,
    f: impl FnMut(ElementRef<'a>) -> T,
) -> Vec<T> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).map(f).collect(),
        Err(_) => Vec::new(),
    }
}

fn unique_matches(pattern: Option<&Regex>, text: &str) -> Vec<String> {
    let Some(pattern) = pattern else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    pattern
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// Analyzes an HTML document
pub fn analyze_content(html: &str) -> ContentAnalysis {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let headings = [1, 2, 3, 4, 5, 6].map(|level| select_map(root, &format!("h{level}"), text_of));

    let main_content = select_map(root, "p", text_of)
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let tables = select_map(root, "table", |table| TableSummary {
        headers: select_map(table, "th", text_of),
        rows: select_map(table, "tr", |row| select_map(row, "td", text_of))
            .into_iter()
            .filter(|cells| !cells.is_empty())
            .collect(),
    });

    let mut meta_tags: Vec<(String, String)> = Vec::new();
    for meta in select_map(root, "meta", |m| m) {
        let key = attr(meta, "name")
            .or_else(|| attr(meta, "property"))
            .unwrap_or_else(|| "unknown".to_string());
        let content = attr(meta, "content").unwrap_or_default();
        match meta_tags.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = content,
            None => meta_tags.push((key, content)),
        }
    }

    let scripts = select_map(root, "script", |script| ScriptRef {
        src: attr(script, "src"),
        content: Some(text_of(script)).filter(|body| !body.is_empty()),
    });

    let forms = select_map(root, "form", |form| FormSummary {
        action: attr(form, "action"),
        method: attr(form, "method"),
        inputs: select_map(form, "input", |input| FormField {
            name: attr(input, "name"),
            field_type: attr(input, "type"),
        }),
    });

    let comments = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_comment().map(|c| c.trim().to_string()))
        .filter(|c| !c.is_empty())
        .collect();

    ContentAnalysis {
        headings,
        unordered_items: select_map(root, "ul li", text_of),
        ordered_items: select_map(root, "ol li", text_of),
        blockquotes: select_map(root, "blockquote", text_of),
        tables,
        links: extract_anchors(&document),
        images: select_map(root, "img", |img| ImageRef {
            src: attr(img, "src"),
            alt: attr(img, "alt"),
        }),
        meta_tags,
        scripts,
        forms,
        iframes: select_map(root, "iframe[src]", |f| attr(f, "src").unwrap_or_default()),
        comments,
        email_addresses: unique_matches(email_pattern(), &main_content),
        phone_numbers: unique_matches(phone_pattern(), &main_content),
        main_content,
    }
}

pub async fn collect_content_analysis(fetcher: &Fetcher, url: &str) -> Option<ContentAnalysis> {
    let page = fetch_document(fetcher, url).await?;
    Some(analyze_content(&page.text()))
}
