//! webrecon main entry point
//!
//! This is the command-line interface for the webrecon site reconnaissance
//! tool.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webrecon::config::{load_config_with_hash, validate, Config};
use webrecon::coordinator::seed_directory_name;
use webrecon::tasks::{parse_task_selectors, Task};
use webrecon::url::parse_seed;
use webrecon::{Coordinator, ReconError};

/// webrecon: a polite website reconnaissance tool
///
/// Walks a site's cross-domain and same-domain links and runs a selectable
/// set of analyses (robots.txt, sitemap, metadata, content, broken links,
/// timing, cookies, language, rendered HTML), writing one report per task.
#[derive(Parser, Debug)]
#[command(name = "webrecon")]
#[command(version)]
#[command(about = "A polite website reconnaissance tool", long_about = None)]
struct Cli {
    /// Site to inspect; https:// is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Comma-separated task numbers (1-12)
    #[arg(short, long, default_value = "1,2")]
    tasks: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Root directory for reports
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Also record findings in this SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Maximum pages fetched per walk
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum same-domain walk depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Delay between walk requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Validate config and show the task plan without making requests
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(database) = &self.database {
            config.output.database_path = Some(database.clone());
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.request_delay_ms = delay_ms;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_ref())?;

    let (mut config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration after command-line overrides")?;

    let tasks = parse_task_selectors(&cli.tasks)?;
    let seed = parse_seed(&cli.url).with_context(|| format!("Invalid URL '{}'", cli.url))?;

    if cli.dry_run {
        print_plan(&config, &config_hash, seed.url(), &tasks);
        return Ok(());
    }

    let mut coordinator = Coordinator::new(config, config_hash, seed)?;

    match coordinator.run(&tasks).await {
        Ok(reports) => {
            for report in &reports {
                println!("{}: {}", report.task(), report.findings.summary());
            }
            println!("Reports saved to {}", coordinator.directory().display());
            Ok(())
        }
        Err(ReconError::SeedUnreachable { url, reason }) => {
            tracing::error!("Seed {} unreachable: {}", url, reason);
            eprintln!("Error accessing {}. Please check the URL and try again.", url);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webrecon=info,warn"),
            1 => EnvFilter::new("webrecon=debug,info"),
            2 => EnvFilter::new("webrecon=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            builder.with_writer(Arc::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles --dry-run: shows the effective configuration and task plan
fn print_plan(config: &Config, config_hash: &str, seed: &url::Url, tasks: &[Task]) {
    println!("=== webrecon Dry Run ===\n");
    println!("Seed: {}", seed);
    println!("Config hash: {}", config_hash);

    println!("\nCrawler:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Max pages per walk: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Follow internal pages: {}", config.crawler.follow_internal);
    println!("  Retry: {} attempts, {}ms apart", config.retry.attempts, config.retry.delay_ms);
    println!("  User agents in pool: {}", config.user_agent.pool.len());

    println!("\nOutput:");
    println!(
        "  Reports: {}",
        std::path::Path::new(&config.output.directory)
            .join(seed_directory_name(seed))
            .display()
    );
    match &config.output.database_path {
        Some(path) => println!("  Database: {}", path),
        None => println!("  Database: (disabled)"),
    }

    println!("\nTasks ({}):", tasks.len());
    for task in tasks {
        println!("  {} -> {}", task, task.report_file_name());
    }

    if tasks.contains(&Task::JsContent) {
        println!("\nRender providers:");
        for renderer in config.effective_renderers() {
            println!("  - {} ({})", renderer.name, renderer.program);
        }
    }
}
