use crate::url::{resolve, Authority};
use crate::UrlError;
use std::fmt;
use url::Url;

/// A resolved URL paired with the authority it was written with
///
/// The URL is what gets fetched. The authority is what domain comparison
/// uses: it comes from the href when the href names a host, and is inherited
/// from the page the href was found on otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    url: Url,
    authority: Authority,
}

impl Link {
    pub fn new(url: Url, authority: Authority) -> Self {
        Self { url, authority }
    }

    /// Resolves an href found on this page
    ///
    /// ```
    /// use url::Url;
    /// use webrecon::url::Link;
    ///
    /// let page = Link::from(Url::parse("https://a.test/docs/").unwrap());
    ///
    /// let relative = page.resolve("intro#top").unwrap();
    /// assert_eq!(relative.as_str(), "https://a.test/docs/intro#top");
    /// assert_eq!(relative.authority().as_str(), "https://a.test");
    ///
    /// let shouting = page.resolve("https://A.TEST/x").unwrap();
    /// assert_eq!(shouting.as_str(), "https://a.test/x");
    /// assert_eq!(shouting.authority().as_str(), "https://A.TEST");
    /// ```
    pub fn resolve(&self, href: &str) -> Result<Link, UrlError> {
        let url = resolve(&self.url, href)?;
        let authority =
            Authority::in_href(href, &self.authority).unwrap_or_else(|| self.authority.clone());
        Ok(Self { url, authority })
    }

    /// Same link with any `#fragment` removed
    pub fn without_fragment(mut self) -> Self {
        self.url.set_fragment(None);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Takes the authority from the parsed URL
impl From<Url> for Link {
    fn from(url: Url) -> Self {
        let authority = Authority::of(&url).unwrap_or_else(|| Authority::hostless(&url));
        Self { url, authority }
    }
}

impl From<&Url> for Link {
    fn from(url: &Url) -> Self {
        Self::from(url.clone())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}
