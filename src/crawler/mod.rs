//! Crawler module for page fetching and link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport and identity rotation
//! - Fetching with bounded retry
//! - HTML parsing and anchor extraction
//! - Politeness pacing
//! - The cross-domain (breadth-first) and same-domain (depth-first) walks

mod cross_domain;
mod fetcher;
mod identity;
mod parser;
mod same_domain;
mod throttle;
mod transport;
mod visited;
mod walk;

#[cfg(test)]
pub(crate) mod testing;

pub use cross_domain::CrossDomainWalker;
pub use fetcher::{FetchError, FetchFailure, FetchResult, FetchedPage, Fetcher, RetryPolicy};
pub use identity::{FixedSequence, IdentityStrategy, RandomPool};
pub use parser::{extract_anchors, extract_sources, extract_title, parse_html, LinkRecord, ParsedPage};
pub use same_domain::SameDomainWalker;
pub use throttle::Throttle;
pub use transport::{build_http_client, RawResponse, ReqwestTransport, Transport, TransportError};
pub use visited::VisitedSet;
pub use walk::{WalkLimits, WalkOutcome, WalkStats};
