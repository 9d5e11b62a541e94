//! In-memory transport for walk and task tests

use crate::crawler::fetcher::{Fetcher, RetryPolicy};
use crate::crawler::identity::FixedSequence;
use crate::crawler::transport::{RawResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves a fixed map of URL to response; unknown URLs refuse the connection
#[derive(Debug, Default)]
pub(crate) struct StaticTransport {
    responses: HashMap<String, RawResponse>,
    calls: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.respond(url, 200, vec![("content-type", "text/html")], html)
    }

    pub(crate) fn respond(
        mut self,
        url: &str,
        status: u16,
        headers: Vec<(&str, &str)>,
        body: &str,
    ) -> Self {
        self.responses.insert(
            url.to_string(),
            RawResponse {
                status,
                final_url: url.to_string(),
                headers: headers
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    /// Every requested URL, in request order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str, _user_agent: &str) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Connect(format!("no route to {url}")))
    }
}

/// Single-attempt fetcher over the given transport
pub(crate) fn test_fetcher(transport: Arc<StaticTransport>) -> Fetcher {
    Fetcher::new(
        transport,
        Arc::new(FixedSequence::new(["TestAgent/1.0"])),
        RetryPolicy {
            attempts: 1,
            delay: Duration::ZERO,
        },
    )
}
