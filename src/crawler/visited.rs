//! Set of URLs already queued or fetched by one walk

use std::collections::HashSet;

/// URLs seen during a single walk
///
/// Entries are the resolved URL's serialization, so two hrefs that resolve to
/// the same absolute URL collapse into one entry. The set only grows.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`, returning `true` if it was not already present
    pub fn mark(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
