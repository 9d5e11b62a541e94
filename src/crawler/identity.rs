//! User-Agent selection strategies
//!
//! Each request carries one identity picked from a pool. The default strategy
//! picks uniformly at random with no state between calls; tests substitute a
//! fixed sequence.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity used when a strategy is given an empty pool
const FALLBACK_AGENT: &str = concat!("webrecon/", env!("CARGO_PKG_VERSION"));

/// Chooses the User-Agent header for the next request
pub trait IdentityStrategy: Send + Sync {
    fn pick(&self) -> String;
}

/// Independent uniform pick from a fixed pool on every call
#[derive(Debug, Clone)]
pub struct RandomPool {
    agents: Vec<String>,
}

impl RandomPool {
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl IdentityStrategy for RandomPool {
    fn pick(&self) -> String {
        if self.agents.is_empty() {
            return FALLBACK_AGENT.to_string();
        }
        let index = rand::rng().random_range(0..self.agents.len());
        self.agents[index].clone()
    }
}

/// Cycles through the pool in order
#[derive(Debug)]
pub struct FixedSequence {
    agents: Vec<String>,
    cursor: AtomicUsize,
}

impl FixedSequence {
    pub fn new<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            agents: agents.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl IdentityStrategy for FixedSequence {
    fn pick(&self) -> String {
        if self.agents.is_empty() {
            return FALLBACK_AGENT.to_string();
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.agents.len();
        self.agents[index].clone()
    }
}
