//! HTTP fetcher with identity rotation and retry
//!
//! Every request picks a fresh User-Agent from the identity strategy. A
//! request is attempted up to `RetryPolicy::attempts` times with a fixed delay
//! between attempts (no delay after the last one).
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | 2xx, 3xx, 4xx (except 429) | Success, returned to caller |
//! | HTTP 429 | Retry |
//! | HTTP 5xx | Retry |
//! | Timeout / connection error | Retry |
//! | Attempts exhausted | Failure, logged at error level |

use crate::config::{Config, RetryConfig};
use crate::crawler::identity::{IdentityStrategy, RandomPool};
use crate::crawler::transport::{RawResponse, ReqwestTransport, Transport, TransportError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a fetch produced no usable page
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(#[from] TransportError),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyResponse,
}

/// How many times and how far apart a request is attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Statuses that count as a failed attempt
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429 || status >= 500
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// A page returned by the server
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Time from first attempt to the successful response
    pub elapsed: Duration,
    /// Attempt number that succeeded (1-based)
    pub attempts: u32,
}

impl FetchedPage {
    fn from_response(url: &str, response: RawResponse, elapsed: Duration, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            final_url: response.final_url,
            status_code: response.status,
            headers: response.headers,
            body: response.body,
            elapsed,
            attempts,
        }
    }

    /// Body decoded as UTF-8 (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body as text, or `EmptyResponse` when the server sent nothing
    pub fn html(&self) -> Result<String, FetchError> {
        if self.body.is_empty() {
            return Err(FetchError::EmptyResponse);
        }
        Ok(self.text())
    }

    /// First header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All headers with the given name (case-insensitive), in arrival order
    pub fn header_values<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// A request that never produced a usable response
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub url: String,
    /// Status of the last attempt, if the server answered at all
    pub status_code: Option<u16>,
    pub error: FetchError,
    pub attempts: u32,
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    Success(FetchedPage),
    Failure(FetchFailure),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    pub fn page(&self) -> Option<&FetchedPage> {
        match self {
            FetchResult::Success(page) => Some(page),
            FetchResult::Failure(_) => None,
        }
    }

    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            FetchResult::Success(page) => Some(page),
            FetchResult::Failure(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchResult::Success(page) => Some(page.status_code),
            FetchResult::Failure(failure) => failure.status_code,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            FetchResult::Success(page) => page.attempts,
            FetchResult::Failure(failure) => failure.attempts,
        }
    }
}

/// Issues GET requests with identity rotation and bounded retry
///
/// Cloning is cheap; clones share the transport and identity strategy.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    identity: Arc<dyn IdentityStrategy>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        identity: Arc<dyn IdentityStrategy>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            identity,
            policy,
        }
    }

    /// Builds the production fetcher: reqwest transport, random identity pool
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config.crawler.request_timeout())?;
        let identity = RandomPool::new(config.user_agent.pool.clone());

        Ok(Self::new(
            Arc::new(transport),
            Arc::new(identity),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL, retrying failed attempts
    ///
    /// Each failed attempt is logged at info level. When every attempt has
    /// failed, an error is logged and a `FetchResult::Failure` is returned;
    /// this never panics or propagates an error.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let attempts = self.policy.attempts.max(1);
        let started = Instant::now();
        let mut last_status = None;
        let mut last_error = None;

        for attempt in 1..=attempts {
            let user_agent = self.identity.pick();
            tracing::trace!("GET {} (attempt {}, agent {})", url, attempt, user_agent);

            match self.transport.get(url, &user_agent).await {
                Ok(response) if RetryPolicy::is_retryable_status(response.status) => {
                    tracing::info!(
                        "Attempt {}/{} for {} failed: HTTP {}",
                        attempt,
                        attempts,
                        url,
                        response.status
                    );
                    last_status = Some(response.status);
                    last_error = Some(FetchError::Status(response.status));
                }
                Ok(response) => {
                    return FetchResult::Success(FetchedPage::from_response(
                        url,
                        response,
                        started.elapsed(),
                        attempt,
                    ));
                }
                Err(e) => {
                    tracing::info!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                    last_status = None;
                    last_error = Some(FetchError::Network(e));
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        tracing::error!("All {} attempts to access {} failed", attempts, url);

        FetchResult::Failure(FetchFailure {
            url: url.to_string(),
            status_code: last_status,
            error: last_error.unwrap_or(FetchError::EmptyResponse),
            attempts,
        })
    }
}
