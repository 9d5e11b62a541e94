//! Report model and the sink trait
//!
//! Every task produces one `TaskReport`. Sinks receive reports as tasks
//! finish and are told once when the run is over.

use crate::render::{RenderError, RenderedPage};
use crate::robots::RobotsReport;
use crate::tasks::{
    BrokenLink, ContentAnalysis, Cookie, PageMetadata, PerformanceMetrics, Task,
};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

/// Outcome of the rendering task
#[derive(Debug, Clone)]
pub enum JsCapture {
    Rendered {
        page: RenderedPage,
        /// Where the HTML was saved, if saving succeeded
        saved_to: Option<PathBuf>,
    },
    Failed(RenderError),
}

/// What one task found
#[derive(Debug, Clone)]
pub enum Findings {
    CrossDomainLinks(Vec<String>),
    PageLinks(Vec<String>),
    Robots(RobotsReport),
    EmbeddedLinks(Vec<String>),
    Metadata(PageMetadata),
    /// `None` when the page could not be retrieved
    Content(Option<Box<ContentAnalysis>>),
    BrokenLinks(Vec<BrokenLink>),
    Performance(PerformanceMetrics),
    Cookies(Vec<Cookie>),
    SitemapUrls(Vec<String>),
    Language(String),
    JsContent(JsCapture),
}

impl Findings {
    pub fn task(&self) -> Task {
        match self {
            Findings::CrossDomainLinks(_) => Task::CrossDomainLinks,
            Findings::PageLinks(_) => Task::PageLinks,
            Findings::Robots(_) => Task::RobotsTxt,
            Findings::EmbeddedLinks(_) => Task::EmbeddedLinks,
            Findings::Metadata(_) => Task::Metadata,
            Findings::Content(_) => Task::ContentAnalysis,
            Findings::BrokenLinks(_) => Task::BrokenLinks,
            Findings::Performance(_) => Task::Performance,
            Findings::Cookies(_) => Task::Cookies,
            Findings::SitemapUrls(_) => Task::Sitemap,
            Findings::Language(_) => Task::Language,
            Findings::JsContent(_) => Task::JsContent,
        }
    }

    /// One-line description for progress output
    pub fn summary(&self) -> String {
        match self {
            Findings::CrossDomainLinks(links)
            | Findings::PageLinks(links)
            | Findings::EmbeddedLinks(links)
            | Findings::SitemapUrls(links) => format!("{} links", links.len()),
            Findings::Robots(report) if report.found() => {
                format!("robots.txt found, {} sitemaps listed", report.sitemaps.len())
            }
            Findings::Robots(_) => "no robots.txt".to_string(),
            Findings::Metadata(metadata) => format!("title: {}", metadata.title),
            Findings::Content(Some(analysis)) => format!(
                "{} links, {} images, {} forms",
                analysis.links.len(),
                analysis.images.len(),
                analysis.forms.len()
            ),
            Findings::Content(None) => "page unavailable".to_string(),
            Findings::BrokenLinks(broken) => format!("{} broken links", broken.len()),
            Findings::Performance(metrics) => match (metrics.load_time, metrics.page_size) {
                (Some(time), Some(size)) => {
                    format!("{:.3}s, {} bytes", time.as_secs_f64(), size)
                }
                _ => "N/A".to_string(),
            },
            Findings::Cookies(cookies) => format!("{} cookies", cookies.len()),
            Findings::Language(language) => format!("language: {}", language),
            Findings::JsContent(JsCapture::Rendered { page, .. }) => {
                format!("{} bytes rendered by {}", page.html.len(), page.provider)
            }
            Findings::JsContent(JsCapture::Failed(e)) => format!("render failed: {}", e),
        }
    }

    /// Flattened `(key, value)` pairs, as stored in the findings table
    pub fn entries(&self) -> Vec<(String, String)> {
        fn pair(key: &str, value: impl ToString) -> (String, String) {
            (key.to_string(), value.to_string())
        }

        match self {
            Findings::CrossDomainLinks(links)
            | Findings::PageLinks(links)
            | Findings::EmbeddedLinks(links)
            | Findings::SitemapUrls(links) => links.iter().map(|l| pair("link", l)).collect(),
            Findings::Robots(report) => {
                let mut entries = vec![pair("url", &report.url), pair("found", report.found())];
                if let Some(delay) = report.crawl_delay {
                    entries.push(pair("crawl_delay", delay));
                }
                if let Some(allowed) = report.seed_allowed {
                    entries.push(pair("seed_allowed", allowed));
                }
                entries.extend(report.sitemaps.iter().map(|s| pair("sitemap", s)));
                if let Some(content) = &report.content {
                    entries.push(pair("content", content));
                }
                entries
            }
            Findings::Metadata(metadata) => vec![
                pair("title", &metadata.title),
                pair("description", &metadata.description),
            ],
            Findings::Content(None) => Vec::new(),
            Findings::Content(Some(analysis)) => content_entries(analysis),
            Findings::BrokenLinks(broken) => broken
                .iter()
                .map(|b| (b.url.clone(), b.reason.clone()))
                .collect(),
            Findings::Performance(metrics) => {
                let mut entries = vec![pair("attempts", metrics.attempts)];
                if let Some(time) = metrics.load_time {
                    entries.push(pair("load_time_secs", time.as_secs_f64()));
                }
                if let Some(size) = metrics.page_size {
                    entries.push(pair("page_size_bytes", size));
                }
                if let Some(status) = metrics.status_code {
                    entries.push(pair("status_code", status));
                }
                entries
            }
            Findings::Cookies(cookies) => cookies
                .iter()
                .map(|c| (c.name.clone(), c.value.clone()))
                .collect(),
            Findings::Language(language) => vec![pair("language", language)],
            Findings::JsContent(JsCapture::Rendered { page, saved_to }) => {
                let mut entries = vec![
                    pair("provider", &page.provider),
                    pair("html_bytes", page.html.len()),
                ];
                if let Some(path) = saved_to {
                    entries.push(pair("saved_to", path.display()));
                }
                entries
            }
            Findings::JsContent(JsCapture::Failed(e)) => vec![pair("error", e)],
        }
    }
}

fn content_entries(analysis: &ContentAnalysis) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut push = |key: &str, value: &str| entries.push((key.to_string(), value.to_string()));

    for (level, texts) in analysis.headings.iter().enumerate() {
        let key = format!("h{}", level + 1);
        texts.iter().for_each(|t| push(&key, t));
    }
    if !analysis.main_content.is_empty() {
        push("main_content", &analysis.main_content);
    }
    analysis.unordered_items.iter().for_each(|i| push("ul_item", i));
    analysis.ordered_items.iter().for_each(|i| push("ol_item", i));
    analysis.blockquotes.iter().for_each(|q| push("blockquote", q));
    for table in &analysis.tables {
        push("table_headers", &table.headers.join(", "));
        table.rows.iter().for_each(|r| push("table_row", &r.join(", ")));
    }
    analysis.links.iter().for_each(|l| push("link", &l.href));
    for image in &analysis.images {
        push("image", image.src.as_deref().unwrap_or(""));
    }
    for (name, content) in &analysis.meta_tags {
        push(&format!("meta:{}", name), content);
    }
    for script in &analysis.scripts {
        match (&script.src, &script.content) {
            (Some(src), _) => push("script", src),
            (None, Some(body)) => push("inline_script", body),
            (None, None) => {}
        }
    }
    for form in &analysis.forms {
        let method = form.method.as_deref().unwrap_or("get");
        let action = form.action.as_deref().unwrap_or("");
        push("form", &format!("{} {}", method, action));
    }
    analysis.iframes.iter().for_each(|f| push("iframe", f));
    analysis.comments.iter().for_each(|c| push("comment", c));
    analysis.email_addresses.iter().for_each(|e| push("email", e));
    analysis.phone_numbers.iter().for_each(|p| push("phone", p));

    entries
}

/// The result of running one task against one seed
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub seed: String,
    pub generated_at: DateTime<Utc>,
    pub config_hash: String,
    pub findings: Findings,
}

impl TaskReport {
    pub fn new(seed: impl Into<String>, config_hash: impl Into<String>, findings: Findings) -> Self {
        Self {
            seed: seed.into(),
            generated_at: Utc::now(),
            config_hash: config_hash.into(),
            findings,
        }
    }

    pub fn task(&self) -> Task {
        self.findings.task()
    }
}

/// Destination for task reports
pub trait ReportSink: Send {
    /// Records one finished task
    fn write(&mut self, report: &TaskReport) -> OutputResult<()>;

    /// Called once after the last report
    fn finish(&mut self, status: RunStatus) -> OutputResult<()>;
}
