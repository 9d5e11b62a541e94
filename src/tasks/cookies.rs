use crate::crawler::{FetchResult, Fetcher};

/// A cookie set by the server, attributes dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Parses the `name=value` pair at the start of a `Set-Cookie` header
pub fn parse_set_cookie(header: &str) -> Option<Cookie> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();

    if name.is_empty() {
        return None;
    }

    Some(Cookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
    })
}

/// Cookies the seed sets on a plain GET
pub async fn capture_cookies(fetcher: &Fetcher, url: &str) -> Vec<Cookie> {
    match fetcher.fetch(url).await {
        FetchResult::Success(page) => page.header_values("set-cookie").filter_map(parse_set_cookie).collect(),
        FetchResult::Failure(failure) => {
            tracing::error!("Could not retrieve cookies from {}: {}", url, failure.error);
            Vec::new()
        }
    }
}
