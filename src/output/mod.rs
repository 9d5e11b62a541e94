//! Output module for task reports
//!
//! This module handles:
//! - The report model produced by each task
//! - Markdown report files, one per task
//! - An optional SQLite database of findings across runs
//! - Saving rendered HTML next to the reports

mod markdown;
mod sqlite_output;
mod traits;

pub use markdown::{format_report, MarkdownSink};
pub use sqlite_output::{SqliteSink, REPORT_SCHEMA_SQL};
pub use traits::{Findings, JsCapture, OutputError, OutputResult, ReportSink, RunStatus, TaskReport};

use std::path::{Path, PathBuf};

/// Saves rendered HTML as `<name>-js-content.html` in `directory`
pub fn save_rendered_html(directory: &Path, name: &str, html: &str) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(format!("{}-js-content.html", name));
    std::fs::write(&path, html)?;
    tracing::info!("Rendered HTML saved to {}", path.display());
    Ok(path)
}
