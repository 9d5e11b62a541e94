use crate::crawler::{FetchResult, Fetcher};
use std::time::Duration;

/// Timing and size of one fetch of the seed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Wall-clock time including any retries; `None` if the fetch failed
    pub load_time: Option<Duration>,
    /// Body size in bytes
    pub page_size: Option<usize>,
    pub status_code: Option<u16>,
    pub attempts: u32,
}

pub async fn measure_performance(fetcher: &Fetcher, url: &str) -> PerformanceMetrics {
    match fetcher.fetch(url).await {
        FetchResult::Success(page) => PerformanceMetrics {
            load_time: Some(page.elapsed),
            page_size: Some(page.body.len()),
            status_code: Some(page.status_code),
            attempts: page.attempts,
        },
        FetchResult::Failure(failure) => PerformanceMetrics {
            load_time: None,
            page_size: None,
            status_code: failure.status_code,
            attempts: failure.attempts,
        },
    }
}
