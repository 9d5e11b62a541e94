//! Integration tests for webrecon
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! walks and the full task pipeline end-to-end. Distinct mock servers listen
//! on distinct ports, so each one is its own authority.

mod crawl_tests;
mod report_tests;

use webrecon::config::Config;

/// Configuration with no pacing and instant retries
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.retry.delay_ms = 0;
    config
}

/// Wraps anchors in a minimal HTML page
pub fn html_page(anchors: &[(&str, &str)]) -> String {
    let body: String = anchors
        .iter()
        .map(|(href, text)| format!(r#"<a href="{}">{}</a>"#, href, text))
        .collect();
    format!("<html><head><title>Test</title></head><body>{}</body></html>", body)
}
