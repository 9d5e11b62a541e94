//! Markdown report generation
//!
//! One file per task in the run's result directory. Every file starts with a
//! `# URL: <seed>` heading followed by `## <Section>` blocks.

use crate::output::traits::{Findings, JsCapture, OutputResult, ReportSink, RunStatus, TaskReport};
use crate::robots::RobotsReport;
use crate::tasks::{ContentAnalysis, PerformanceMetrics};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each task report to its own markdown file
#[derive(Debug)]
pub struct MarkdownSink {
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl MarkdownSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            written: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ReportSink for MarkdownSink {
    fn write(&mut self, report: &TaskReport) -> OutputResult<()> {
        fs::create_dir_all(&self.directory)?;

        let path = self.directory.join(report.task().report_file_name());
        fs::write(&path, format_report(report))?;

        tracing::info!("Data saved to {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self, _status: RunStatus) -> OutputResult<()> {
        tracing::debug!(
            "Wrote {} markdown reports to {}",
            self.written.len(),
            self.directory.display()
        );
        Ok(())
    }
}

/// Formats a task report as markdown
pub fn format_report(report: &TaskReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# URL: {}\n\n", report.seed));
    md.push_str(&format!(
        "_Generated {} (config {})_\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        short_hash(&report.config_hash),
    ));

    match &report.findings {
        Findings::CrossDomainLinks(links) => write_list(&mut md, "Subdomain Links", links),
        Findings::PageLinks(links) => write_list(&mut md, "Pages Links", links),
        Findings::Robots(robots) => write_robots(&mut md, robots),
        Findings::EmbeddedLinks(links) => write_list(&mut md, "Embedded Links", links),
        Findings::Metadata(metadata) => {
            md.push_str(&format!(
                "## Metadata\n**Title:** {}\n**Description:** {}\n\n",
                metadata.title,
                metadata.description,
            ));
        }
        Findings::Content(Some(analysis)) => write_content_analysis(&mut md, analysis),
        Findings::Content(None) => {
            md.push_str("## Content Analysis\nThe page could not be retrieved.\n\n");
        }
        Findings::BrokenLinks(broken) => {
            let items: Vec<String> = broken
                .iter()
                .map(|b| format!("{} ({})", b.url, b.reason))
                .collect();
            write_list(&mut md, "Broken Links", &items);
        }
        Findings::Performance(metrics) => write_performance(&mut md, metrics),
        Findings::Cookies(cookies) => {
            let items: Vec<String> = cookies
                .iter()
                .map(|c| format!("{}: {}", c.name, c.value))
                .collect();
            write_list(&mut md, "Cookies", &items);
        }
        Findings::SitemapUrls(urls) => write_list(&mut md, "Sitemap URLs", urls),
        Findings::Language(language) => {
            md.push_str(&format!("## Detected Language\n{}\n\n", language));
        }
        Findings::JsContent(JsCapture::Rendered { page, saved_to }) => {
            md.push_str("## JavaScript Content\n");
            md.push_str(&format!("Rendered by `{}`.\n", page.provider));
            if let Some(path) = saved_to {
                md.push_str(&format!("Saved to `{}`.\n", path.display()));
            }
            md.push_str(&format!("\n```html\n{}\n```\n\n", page.html.trim_end()));
        }
        Findings::JsContent(JsCapture::Failed(e)) => {
            md.push_str(&format!("## JavaScript Content\nRendering failed: {}\n\n", e));
        }
    }

    md
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn write_list<S: AsRef<str>>(md: &mut String, title: &str, items: &[S]) {
    md.push_str(&format!("## {}\n", title));
    if items.is_empty() {
        md.push_str("None found.\n\n");
        return;
    }
    for item in items {
        md.push_str(&format!("- {}\n", item.as_ref()));
    }
    md.push('\n');
}

fn write_robots(md: &mut String, robots: &RobotsReport) {
    md.push_str(&format!("## Robots.txt\n{}\n\n", robots.display_text().trim_end()));

    if !robots.found() {
        return;
    }

    md.push_str("### Interpretation\n");
    match robots.seed_allowed {
        Some(true) => md.push_str("- Seed URL allowed for generic agents\n"),
        Some(false) => md.push_str("- Seed URL disallowed for generic agents\n"),
        None => {}
    }
    if let Some(delay) = robots.crawl_delay {
        md.push_str(&format!("- Crawl-delay: {} seconds\n", delay));
    }
    for sitemap in &robots.sitemaps {
        md.push_str(&format!("- Sitemap: {}\n", sitemap));
    }
    md.push('\n');
}

fn write_performance(md: &mut String, metrics: &PerformanceMetrics) {
    let load_time = metrics
        .load_time
        .map(|t| format!("{:.3}", t.as_secs_f64()))
        .unwrap_or_else(|| "N/A".to_string());
    let page_size = metrics
        .page_size
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    md.push_str(&format!(
        "## Performance Metrics\n**Load Time:** {} seconds\n**Page Size:** {} bytes\n\n",
        load_time,
        page_size,
    ));
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

fn write_content_analysis(md: &mut String, analysis: &ContentAnalysis) {
    md.push_str("## Content Analysis\n### Headers\n");
    for (level, texts) in analysis.headings.iter().enumerate() {
        md.push_str(&format!("#### H{}\n", level + 1));
        for text in texts {
            md.push_str(&format!("- {}\n", text));
        }
    }

    md.push_str(&format!("\n### Main Content\n{}\n\n", analysis.main_content));

    md.push_str("### Lists\n#### UL\n");
    for item in &analysis.unordered_items {
        md.push_str(&format!("- {}\n", item));
    }
    md.push_str("#### OL\n");
    for item in &analysis.ordered_items {
        md.push_str(&format!("- {}\n", item));
    }

    md.push_str("\n### Blockquotes\n");
    for quote in &analysis.blockquotes {
        md.push_str(&format!("- {}\n", quote));
    }

    md.push_str("\n### Tables\n");
    for table in &analysis.tables {
        md.push_str(&format!("**Headers:** {}\n", table.headers.join(", ")));
        for row in &table.rows {
            md.push_str(&format!("**Row:** {}\n", row.join(", ")));
        }
    }

    md.push_str("\n### Links\n");
    for link in &analysis.links {
        md.push_str(&format!("- **Text:** {}\n  **URL:** {}\n", link.text, link.href));
    }

    md.push_str("\n### Images\n");
    for image in &analysis.images {
        md.push_str(&format!("- **SRC:** {}\n  **ALT:** {}\n", opt(&image.src), opt(&image.alt)));
    }

    md.push_str("\n### Meta Tags\n");
    for (name, content) in &analysis.meta_tags {
        md.push_str(&format!("- **{}:** {}\n", name, content));
    }

    md.push_str("\n### Scripts\n");
    for script in &analysis.scripts {
        md.push_str(&format!("- **SRC:** {}\n  **Content:** {}\n", opt(&script.src), opt(&script.content)));
    }

    md.push_str("\n### Forms\n");
    for form in &analysis.forms {
        md.push_str(&format!(
            "- **Action:** {}\n  **Method:** {}\n  **Inputs:**\n",
            opt(&form.action),
            opt(&form.method),
        ));
        for input in &form.inputs {
            md.push_str(&format!(
                "  - **Name:** {}  **Type:** {}\n",
                opt(&input.name),
                opt(&input.field_type),
            ));
        }
    }

    md.push_str("\n### IFrames\n");
    for iframe in &analysis.iframes {
        md.push_str(&format!("- **SRC:** {}\n", iframe));
    }

    md.push_str("\n### Comments\n");
    for comment in &analysis.comments {
        md.push_str(&format!("- {}\n", comment));
    }

    md.push_str("\n### Email Addresses\n");
    for email in &analysis.email_addresses {
        md.push_str(&format!("- {}\n", email));
    }

    md.push_str("\n### Phone Numbers\n");
    for phone in &analysis.phone_numbers {
        md.push_str(&format!("- {}\n", phone));
    }
}
