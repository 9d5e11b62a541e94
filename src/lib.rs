//! webrecon: a polite website reconnaissance tool
//!
//! This crate crawls a seed site, discovering cross-domain and same-domain links,
//! and runs a selectable set of analysis tasks (robots.txt, sitemap, metadata,
//! content analysis, broken links, timing, cookies, language, rendered HTML)
//! whose results are written to report files.

pub mod config;
pub mod coordinator;
pub mod crawler;
pub mod output;
pub mod render;
pub mod robots;
pub mod tasks;
pub mod url;

use thiserror::Error;

/// Main error type for webrecon operations
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("No valid task selected from '{0}'")]
    NoTasks(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for webrecon operations
pub type Result<T> = std::result::Result<T, ReconError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::Coordinator;
pub use crawler::{FetchResult, Fetcher, VisitedSet};
pub use tasks::Task;
pub use crate::url::{classify, resolve, Authority, Link, LinkClass};
