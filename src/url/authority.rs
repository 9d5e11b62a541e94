use std::fmt;
use url::Url;

/// The `scheme://host[:port]` part of a URL, used for domain equality
///
/// Equality is a plain string comparison. An authority read from link text
/// keeps the host's case and any port exactly as written, so
/// `https://Example.com` and `https://example.com:443` both differ from
/// `https://example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority(String);

impl Authority {
    /// Extracts the authority from a parsed URL
    ///
    /// The parser has already lowercased the host and dropped a default port.
    /// Returns `None` for URLs without a host (`mailto:`, `data:` ...).
    ///
    /// ```
    /// use url::Url;
    /// use webrecon::url::Authority;
    ///
    /// let url = Url::parse("https://example.com:8080/path?q=1").unwrap();
    /// assert_eq!(Authority::of(&url).unwrap().as_str(), "https://example.com:8080");
    /// ```
    pub fn of(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let authority = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };
        Some(Self(authority))
    }

    /// Reads the authority from absolute URL text, as written
    ///
    /// Only the scheme is lowercased. Userinfo is dropped; host and port are
    /// kept verbatim. Returns `None` when the text has no `scheme://host`.
    ///
    /// ```
    /// use webrecon::url::Authority;
    ///
    /// let authority = Authority::parse("HTTPS://user@Example.com:443/a?b#c").unwrap();
    /// assert_eq!(authority.as_str(), "https://Example.com:443");
    /// assert!(Authority::parse("/relative/path").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let (scheme, rest) = text.trim().split_once("://")?;
        let valid_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return None;
        }

        let end = rest.find(['/', '\\', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..end];
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
        if host_port.is_empty() {
            return None;
        }

        Some(Self(format!("{}://{}", scheme.to_ascii_lowercase(), host_port)))
    }

    /// Authority carried by an href, if it names one
    ///
    /// Scheme-relative hrefs (`//cdn.test/x`) take their scheme from `base`.
    /// Relative references carry no authority and yield `None`.
    pub fn in_href(href: &str, base: &Authority) -> Option<Self> {
        let href = href.trim();
        match href.strip_prefix("//") {
            Some(rest) => Self::parse(&format!("{}://{}", base.scheme(), rest)),
            None => Self::parse(href),
        }
    }

    /// Stand-in for URLs without a host; equals no `scheme://host` authority
    pub(crate) fn hostless(url: &Url) -> Self {
        Self(format!("{}:", url.scheme()))
    }

    pub fn scheme(&self) -> &str {
        self.0.split("://").next().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
