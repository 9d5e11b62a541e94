//! Headless rendering of JavaScript-driven pages
//!
//! A `RenderChain` holds providers in priority order and returns the first
//! successful result. The default chain shells out to Chromium, then Chrome.

mod command;

pub use command::CommandRenderer;

use crate::config::Config;
use async_trait::async_trait;
use thiserror::Error;

/// Rendering failures
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("no render providers configured")]
    NoProviders,

    #[error("{provider} could not be started: {message}")]
    Spawn { provider: String, message: String },

    #[error("{provider} timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    #[error("{provider} exited with {status}: {stderr}")]
    Failed {
        provider: String,
        status: String,
        stderr: String,
    },

    #[error("{provider} returned an empty document")]
    Empty { provider: String },
}

/// Final DOM of a page after scripts have run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Name of the provider that produced it
    pub provider: String,
    pub html: String,
}

/// Produces the rendered HTML of a page
#[async_trait]
pub trait Renderer: Send + Sync {
    fn name(&self) -> &str;

    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}

/// Ordered fallback over several renderers
#[derive(Default)]
pub struct RenderChain {
    providers: Vec<Box<dyn Renderer>>,
}

impl RenderChain {
    pub fn new(providers: Vec<Box<dyn Renderer>>) -> Self {
        Self { providers }
    }

    /// One `CommandRenderer` per configured (or default) renderer entry
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .effective_renderers()
                .iter()
                .map(|r| Box::new(CommandRenderer::from_config(r)) as Box<dyn Renderer>)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Tries each provider in order
    ///
    /// Returns the first success, or the last provider's error when all fail.
    pub async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let mut last_error = None;

        for provider in &self.providers {
            tracing::info!("Rendering {} with {}", url, provider.name());
            match provider.render(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    tracing::warn!("Render provider {} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(RenderError::NoProviders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        html: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn render(&self, _url: &str) -> Result<RenderedPage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.html {
                Some(html) => Ok(RenderedPage {
                    provider: self.name.to_string(),
                    html: html.to_string(),
                }),
                None => Err(RenderError::Empty {
                    provider: self.name.to_string(),
                }),
            }
        }
    }

    fn fixed(name: &'static str, html: Option<&'static str>, calls: &Arc<AtomicUsize>) -> Box<dyn Renderer> {
        Box::new(Fixed {
            name,
            html,
            calls: calls.clone(),
        })
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = RenderChain::new(vec![
            fixed("broken", None, &calls),
            fixed("working", Some("<html>ok</html>"), &calls),
            fixed("unused", Some("<html>never</html>"), &calls),
        ]);

        let page = chain.render("https://a.test/").await.unwrap();
        assert_eq!(page.provider, "working");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_fail_returns_last_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = RenderChain::new(vec![fixed("one", None, &calls), fixed("two", None, &calls)]);

        match chain.render("https://a.test/").await {
            Err(RenderError::Empty { provider }) => assert_eq!(provider, "two"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = RenderChain::default();
        assert!(matches!(chain.render("https://a.test/").await, Err(RenderError::NoProviders)));
    }

    #[test]
    fn test_default_chain_from_config() {
        let chain = RenderChain::from_config(&Config::default());
        assert_eq!(chain.len(), 2);
    }
}
