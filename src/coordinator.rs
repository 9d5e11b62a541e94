//! Run coordinator - seed validation and task dispatch
//!
//! This module ties the pieces of a run together:
//! - Validating that the seed answers before anything else happens
//! - Deriving the per-seed result directory
//! - Running the selected tasks in order
//! - Handing each task report to every configured sink

use crate::config::Config;
use crate::crawler::{
    CrossDomainWalker, FetchResult, Fetcher, SameDomainWalker, Throttle, VisitedSet, WalkLimits,
};
use crate::output::{
    save_rendered_html, Findings, JsCapture, MarkdownSink, ReportSink, RunStatus, SqliteSink,
    TaskReport,
};
use crate::render::RenderChain;
use crate::robots::fetch_robots;
use crate::tasks::{
    capture_cookies, check_links, collect_content_analysis, collect_embedded_links,
    collect_language, collect_metadata, collect_sitemap_urls, measure_performance,
    LanguageDetector, MarkupLanguageDetector, Task,
};
use crate::url::{sanitize_filename, Link};
use crate::{ReconError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Directory name used for a seed's results
pub fn seed_directory_name(seed: &Url) -> String {
    sanitize_filename(seed.as_str().trim_end_matches('/'))
}

/// Main run coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    seed: Link,
    seed_name: String,
    directory: PathBuf,
    fetcher: Fetcher,
    throttle: Throttle,
    renderers: RenderChain,
    detector: Box<dyn LanguageDetector>,
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Coordinator {
    /// Creates a coordinator for one seed
    ///
    /// Builds the production fetcher and render chain from `config`, and
    /// opens the SQLite sink when a database path is configured. A plain
    /// `Url` seed uses its parsed authority for domain comparison.
    pub fn new(
        config: Config,
        config_hash: impl Into<String>,
        seed: impl Into<Link>,
    ) -> Result<Self> {
        let seed = seed.into();
        let config_hash = config_hash.into();
        let fetcher = Fetcher::from_config(&config)?;
        let renderers = RenderChain::from_config(&config);
        let seed_name = seed_directory_name(seed.url());
        let directory = Path::new(&config.output.directory).join(&seed_name);

        let mut sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(MarkdownSink::new(&directory))];
        if let Some(database) = &config.output.database_path {
            sinks.push(Box::new(SqliteSink::open(
                Path::new(database),
                seed.as_str(),
                &config_hash,
            )?));
        }

        Ok(Self {
            throttle: Throttle::new(config.crawler.request_delay()),
            config,
            config_hash,
            seed,
            seed_name,
            directory,
            fetcher,
            renderers,
            detector: Box::new(MarkupLanguageDetector),
            sinks,
        })
    }

    /// Replaces the fetcher (custom transport or identity strategy)
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_renderers(mut self, renderers: RenderChain) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_language_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Adds a sink after the configured ones
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn seed(&self) -> &Url {
        self.seed.url()
    }

    /// Per-seed result directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Fetches the seed once; an unreachable seed aborts the run
    pub async fn validate_seed(&self) -> Result<()> {
        match self.fetcher.fetch(self.seed.as_str()).await {
            FetchResult::Success(page) => {
                if !page.is_ok() {
                    tracing::warn!("Seed {} answered HTTP {}", self.seed, page.status_code);
                }
                Ok(())
            }
            FetchResult::Failure(failure) => Err(ReconError::SeedUnreachable {
                url: self.seed.to_string(),
                reason: failure.error.to_string(),
            }),
        }
    }

    /// Runs the selected tasks in the given order
    ///
    /// Each report is written to every sink as soon as its task finishes.
    /// Sinks are finished with `Failed` if the seed is unreachable or a sink
    /// write fails.
    pub async fn run(&mut self, tasks: &[Task]) -> Result<Vec<TaskReport>> {
        if let Err(e) = self.validate_seed().await {
            self.finish_sinks(RunStatus::Failed);
            return Err(e);
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for &task in tasks {
            tracing::info!("Running task {}", task);
            let findings = self.run_task(task).await;
            let report = TaskReport::new(self.seed.as_str(), self.config_hash.as_str(), findings);

            if let Err(e) = self.write_report(&report) {
                self.finish_sinks(RunStatus::Failed);
                return Err(e);
            }
            reports.push(report);
        }

        self.finish_sinks(RunStatus::Completed);
        Ok(reports)
    }

    fn write_report(&mut self, report: &TaskReport) -> Result<()> {
        for sink in &mut self.sinks {
            sink.write(report)?;
        }
        Ok(())
    }

    fn finish_sinks(&mut self, status: RunStatus) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.finish(status) {
                tracing::error!("Failed to finalize report sink: {}", e);
            }
        }
    }

    /// Runs one task against the seed and returns what it found
    pub async fn run_task(&self, task: Task) -> Findings {
        let seed = self.seed.url();
        let limits = WalkLimits::from_config(&self.config.crawler);

        match task {
            Task::CrossDomainLinks => {
                let mut visited = VisitedSet::new();
                let outcome = CrossDomainWalker::new(&self.fetcher, &self.throttle, limits)
                    .follow_internal(self.config.crawler.follow_internal)
                    .walk(self.seed.clone(), &mut visited)
                    .await;
                Findings::CrossDomainLinks(outcome.links)
            }
            Task::PageLinks => {
                let mut visited = VisitedSet::new();
                let outcome = SameDomainWalker::new(&self.fetcher, &self.throttle, limits)
                    .walk(self.seed.clone(), &mut visited)
                    .await;
                Findings::PageLinks(outcome.links)
            }
            Task::RobotsTxt => Findings::Robots(fetch_robots(&self.fetcher, seed).await),
            Task::EmbeddedLinks => {
                Findings::EmbeddedLinks(collect_embedded_links(&self.fetcher, seed.as_str()).await)
            }
            Task::Metadata => Findings::Metadata(collect_metadata(&self.fetcher, seed.as_str()).await),
            Task::ContentAnalysis => Findings::Content(
                collect_content_analysis(&self.fetcher, seed.as_str())
                    .await
                    .map(Box::new),
            ),
            Task::BrokenLinks => Findings::BrokenLinks(
                check_links(&self.fetcher, seed, self.config.crawler.link_check_concurrency).await,
            ),
            Task::Performance => {
                Findings::Performance(measure_performance(&self.fetcher, seed.as_str()).await)
            }
            Task::Cookies => Findings::Cookies(capture_cookies(&self.fetcher, seed.as_str()).await),
            Task::Sitemap => Findings::SitemapUrls(collect_sitemap_urls(&self.fetcher, seed).await),
            Task::Language => Findings::Language(
                collect_language(&self.fetcher, self.detector.as_ref(), seed.as_str()).await,
            ),
            Task::JsContent => Findings::JsContent(self.render_seed().await),
        }
    }

    async fn render_seed(&self) -> JsCapture {
        match self.renderers.render(self.seed.as_str()).await {
            Ok(page) => {
                let saved_to = match save_rendered_html(&self.directory, &self.seed_name, &page.html) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::error!("Failed to save rendered HTML: {}", e);
                        None
                    }
                };
                JsCapture::Rendered { page, saved_to }
            }
            Err(e) => {
                tracing::error!("Could not render {}: {}", self.seed, e);
                JsCapture::Failed(e)
            }
        }
    }
}
