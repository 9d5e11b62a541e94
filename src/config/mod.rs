//! Configuration module for webrecon
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a missing file is the same
//! as an empty one.
//!
//! # Example
//!
//! ```no_run
//! use webrecon::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webrecon.toml")).unwrap();
//! println!("Walks stop after {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_user_agents, Config, CrawlerConfig, OutputConfig, RendererConfig, RetryConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
