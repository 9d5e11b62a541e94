use crate::url::{Authority, Link};
use crate::UrlError;
use url::Url;

/// Resolves an href against the page it was found on
///
/// Relative references are joined per standard URL resolution (`..` segments
/// collapse, query and fragment are kept). Absolute references parse as-is.
///
/// # Errors
///
/// `UrlError::Malformed` when the href is empty or cannot be resolved.
///
/// ```
/// use url::Url;
/// use webrecon::url::resolve;
///
/// let base = Url::parse("https://example.com/a/b").unwrap();
/// assert_eq!(resolve(&base, "../c").unwrap().as_str(), "https://example.com/c");
/// assert_eq!(resolve(&base, "d?x=1#f").unwrap().as_str(), "https://example.com/a/d?x=1#f");
/// ```
pub fn resolve(base: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Malformed("empty href".to_string()));
    }

    base.join(href)
        .map_err(|e| UrlError::Malformed(format!("{}: {}", href, e)))
}

/// Parses a user-supplied seed URL
///
/// A seed typed without a scheme (`example.com`) gets `https://` prefixed.
/// Only http(s) seeds with a host are accepted. The seed's authority is kept
/// as typed, so it is what same-domain links have to match.
pub fn parse_seed(input: &str) -> Result<Link, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS seeds are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(input.to_string()));
    }

    let authority = Authority::parse(&candidate)
        .or_else(|| Authority::of(&url))
        .ok_or_else(|| UrlError::MissingHost(input.to_string()))?;
    Ok(Link::new(url, authority))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/guide/intro").unwrap()
    }

    #[test]
    fn test_resolve_absolute_path() {
        let url = resolve(&base(), "/about").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_sibling() {
        let url = resolve(&base(), "setup").unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/guide/setup");
    }

    #[test]
    fn test_resolve_keeps_query_and_fragment() {
        let url = resolve(&base(), "../api?v=2#auth").unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/api?v=2#auth");
    }

    #[test]
    fn test_resolve_fragment_only() {
        let url = resolve(&base(), "#top").unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/guide/intro#top");
    }

    #[test]
    fn test_resolve_absolute_url_ignores_base() {
        let url = resolve(&base(), "https://other.org/x").unwrap();
        assert_eq!(url.as_str(), "https://other.org/x");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let url = resolve(&base(), "  /padded  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/padded");
    }

    #[test]
    fn test_resolve_empty_is_malformed() {
        assert!(matches!(resolve(&base(), "   "), Err(UrlError::Malformed(_))));
    }

    #[test]
    fn test_resolve_invalid_port_is_malformed() {
        assert!(matches!(
            resolve(&base(), "http://example.com:99999/"),
            Err(UrlError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_seed_adds_https() {
        let url = parse_seed("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_seed_keeps_http() {
        let url = parse_seed("http://127.0.0.1:8080/start").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/start");
    }

    #[test]
    fn test_parse_seed_keeps_typed_authority() {
        let seed = parse_seed("Example.COM:443/start").unwrap();
        assert_eq!(seed.as_str(), "https://example.com/start");
        assert_eq!(seed.authority().as_str(), "https://Example.COM:443");
    }

    #[test]
    fn test_parse_seed_rejects_other_schemes() {
        assert!(matches!(
            parse_seed("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_parse_seed_rejects_empty() {
        assert!(parse_seed("  ").is_err());
    }
}
