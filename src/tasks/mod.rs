//! The numbered recon tasks
//!
//! Tasks 1 and 2 are the two link walks in `crate::crawler`. The rest are
//! single-page analyses of the seed (or of a well-known file at its origin)
//! implemented in the submodules here.

mod content;
mod cookies;
mod embedded;
mod language;
mod links;
mod metadata;
mod performance;
mod sitemap;

pub use content::{
    analyze_content, collect_content_analysis, ContentAnalysis, FormField, FormSummary, ImageRef,
    ScriptRef, TableSummary,
};
pub use cookies::{capture_cookies, parse_set_cookie, Cookie};
pub use embedded::collect_embedded_links;
pub use language::{collect_language, LanguageDetector, MarkupLanguageDetector, UNKNOWN_LANGUAGE};
pub use links::{check_links, BrokenLink};
pub use metadata::{collect_metadata, extract_metadata, PageMetadata};
pub use performance::{measure_performance, PerformanceMetrics};
pub use sitemap::{collect_sitemap_urls, parse_sitemap, sitemap_url};

use crate::crawler::{FetchResult, FetchedPage, Fetcher};
use crate::ReconError;
use std::fmt;

/// A recon task, numbered as on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    CrossDomainLinks = 1,
    PageLinks = 2,
    RobotsTxt = 3,
    EmbeddedLinks = 4,
    Metadata = 5,
    ContentAnalysis = 6,
    BrokenLinks = 7,
    Performance = 8,
    Cookies = 9,
    Sitemap = 10,
    Language = 11,
    JsContent = 12,
}

impl Task {
    pub const ALL: [Task; 12] = [
        Task::CrossDomainLinks,
        Task::PageLinks,
        Task::RobotsTxt,
        Task::EmbeddedLinks,
        Task::Metadata,
        Task::ContentAnalysis,
        Task::BrokenLinks,
        Task::Performance,
        Task::Cookies,
        Task::Sitemap,
        Task::Language,
        Task::JsContent,
    ];

    pub fn selector(self) -> u8 {
        self as u8
    }

    pub fn from_selector(selector: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.selector() == selector)
    }

    /// Human-readable task name, as shown in the task menu
    pub fn label(self) -> &'static str {
        match self {
            Task::CrossDomainLinks => "Subdomain & related links",
            Task::PageLinks => "Page links",
            Task::RobotsTxt => "robots.txt",
            Task::EmbeddedLinks => "Embedded links",
            Task::Metadata => "Metadata",
            Task::ContentAnalysis => "Content analysis",
            Task::BrokenLinks => "Broken links",
            Task::Performance => "Performance metrics",
            Task::Cookies => "Cookies",
            Task::Sitemap => "Sitemap URLs",
            Task::Language => "Language",
            Task::JsContent => "JavaScript content",
        }
    }

    /// Suffix of the report file (`scraped_data_<suffix>.md`)
    pub fn report_suffix(self) -> &'static str {
        match self {
            Task::CrossDomainLinks => "subdomain_links",
            Task::PageLinks => "pages_links",
            Task::RobotsTxt => "robots_txt",
            Task::EmbeddedLinks => "embedded_links",
            Task::Metadata => "metadata",
            Task::ContentAnalysis => "url_analysis",
            Task::BrokenLinks => "broken_links",
            Task::Performance => "performance_metrics",
            Task::Cookies => "cookies",
            Task::Sitemap => "sitemap_urls",
            Task::Language => "language",
            Task::JsContent => "js_content",
        }
    }

    /// Name of the markdown file this task's report is written to
    pub fn report_file_name(self) -> String {
        match self {
            Task::ContentAnalysis => "url_analysis.md".to_string(),
            other => format!("scraped_data_{}.md", other.report_suffix()),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.selector(), self.label())
    }
}

/// Parses a comma-separated selector list such as `"1, 3,5"`
///
/// Unknown or non-numeric entries are logged and skipped. The result is in
/// ascending order without duplicates. An input with no valid selector is an
/// error.
///
/// # Example
///
/// ```
/// use webrecon::tasks::{parse_task_selectors, Task};
///
/// let tasks = parse_task_selectors("3,1,99,1").unwrap();
/// assert_eq!(tasks, vec![Task::CrossDomainLinks, Task::RobotsTxt]);
/// ```
pub fn parse_task_selectors(input: &str) -> Result<Vec<Task>, ReconError> {
    let mut tasks: Vec<Task> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let task = s.parse::<u8>().ok().and_then(Task::from_selector);
            if task.is_none() {
                tracing::warn!("Ignoring unknown task selector '{}'", s);
            }
            task
        })
        .collect();

    tasks.sort();
    tasks.dedup();

    if tasks.is_empty() {
        return Err(ReconError::NoTasks(input.to_string()));
    }

    Ok(tasks)
}

/// Fetches a page for single-page analysis
///
/// Only a 2xx response with a body counts; anything else is logged and
/// treated as unavailable.
pub(crate) async fn fetch_document(fetcher: &Fetcher, url: &str) -> Option<FetchedPage> {
    match fetcher.fetch(url).await {
        FetchResult::Success(page) if page.is_ok() && !page.body.is_empty() => Some(page),
        FetchResult::Success(page) => {
            tracing::warn!("{} returned HTTP {} with {} bytes", url, page.status_code, page.body.len());
            None
        }
        FetchResult::Failure(failure) => {
            tracing::error!("Could not retrieve {}: {}", url, failure.error);
            None
        }
    }
}
