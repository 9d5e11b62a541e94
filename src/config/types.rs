use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for webrecon
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(rename = "renderer")]
    pub renderers: Vec<RendererConfig>,
}

impl Config {
    /// Returns the configured render providers, or the built-in chain when none are set
    pub fn effective_renderers(&self) -> Vec<RendererConfig> {
        if self.renderers.is_empty() {
            RendererConfig::default_chain()
        } else {
            self.renderers.clone()
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between two walker requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of pages fetched by a single walk
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum link depth expanded by the same-domain walk
    #[serde(rename = "max-depth")]
    pub max_depth: usize,

    /// Let the cross-domain walk pass through same-domain pages
    #[serde(rename = "follow-internal")]
    pub follow_internal: bool,

    /// Number of links checked in parallel by the broken-link task
    #[serde(rename = "link-check-concurrency")]
    pub link_check_concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            request_timeout_secs: 30,
            max_pages: 500,
            max_depth: 16,
            follow_internal: false,
            link_check_concurrency: 8,
        }
    }
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Retry behavior for a single fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per fetch, including the first
    pub attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 2000,
        }
    }
}

/// Identity rotation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// User-Agent strings, one picked at random per request
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agents(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for per-target report directories
    pub directory: String,

    /// Path to the SQLite report database (disabled when absent)
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "Results".to_string(),
            database_path: None,
        }
    }
}

/// A headless render provider invoked as an external command
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Name used in logs and reports
    pub name: String,

    /// Executable to run
    pub program: String,

    /// Arguments placed before the target URL
    #[serde(default)]
    pub args: Vec<String>,

    /// Time allowed for one render (seconds)
    #[serde(rename = "timeout-secs", default = "default_render_timeout")]
    pub timeout_secs: u64,
}

fn default_render_timeout() -> u64 {
    60
}

impl RendererConfig {
    /// Chromium first, then Google Chrome, both dumping the final DOM
    pub fn default_chain() -> Vec<Self> {
        let args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--dump-dom".to_string(),
        ];
        vec![
            Self {
                name: "chromium".to_string(),
                program: "chromium".to_string(),
                args: args.clone(),
                timeout_secs: default_render_timeout(),
            },
            Self {
                name: "google-chrome".to_string(),
                program: "google-chrome".to_string(),
                args,
                timeout_secs: default_render_timeout(),
            },
        ]
    }
}

/// Browser identities rotated across requests
pub fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.5845.96 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:118.0) Gecko/20100101 Firefox/118.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_2_0) AppleWebKit/537.36 (KHTML, like Gecko) Version/17.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edg/116.0.1938.76",
        "Mozilla/5.0 (Android 14; Mobile; rv:116.0) Gecko/116.0 Firefox/116.0",
        "Mozilla/5.0 (Android 14; Mobile; rv:118.0) Gecko/118.0 Firefox/118.0",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.5845.96 Safari/537.36 OPR/102.0.4843.38",
        "Mozilla/5.0 (Android 14; Mobile; Samsung SM-G998B; rv:20.0) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/20.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_2_0; rv:118.0) Gecko/20100101 Firefox/118.0",
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:116.0) Gecko/116.0 Firefox/116.0",
    ]
    .iter()
    .map(|ua| ua.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.request_delay(), Duration::from_secs(1));
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.delay_ms, 2000);
        assert!(!config.user_agent.pool.is_empty());
        assert_eq!(config.output.directory, "Results");
        assert!(config.output.database_path.is_none());
    }

    #[test]
    fn test_default_user_agents_are_distinct() {
        let pool = default_user_agents();
        let distinct: std::collections::HashSet<_> = pool.iter().collect();
        assert_eq!(pool.len(), 11);
        assert_eq!(distinct.len(), pool.len());
    }

    #[test]
    fn test_effective_renderers_falls_back_to_default_chain() {
        let config = Config::default();
        let chain = config.effective_renderers();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].name, "chromium");
        assert!(chain[0].args.contains(&"--dump-dom".to_string()));
    }
}
