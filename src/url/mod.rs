//! URL handling module for webrecon
//!
//! This module resolves link references against the page they were found on,
//! keeps the authority (`scheme://host[:port]`) each link was written with for
//! domain comparison, and classifies links as same-domain, cross-domain, or
//! excluded.

mod authority;
mod link;
mod resolve;
mod sanitize;

pub use authority::Authority;
pub use link::Link;
pub use resolve::{parse_seed, resolve};
pub use sanitize::sanitize_filename;


/// Link classification relative to the seed's authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Same `scheme://host[:port]` as the seed
    SameDomain,
    /// An http(s) link to any other authority
    CrossDomain,
    /// Not an http(s) link (`mailto:`, `javascript:`, `tel:`, `data:` ...)
    Excluded,
}

impl LinkClass {
    /// Returns true if the link can be fetched at all
    pub fn is_web(&self) -> bool {
        !matches!(self, Self::Excluded)
    }
}

/// Classifies a resolved link against the seed's authority
///
/// The comparison is an exact, case-sensitive string match on the authority
/// as written, with no default-port normalization: relative to
/// `https://example.com`, the links `https://EXAMPLE.com/x`,
/// `https://example.com:443/x` and `http://example.com/x` are all
/// cross-domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webrecon::url::{classify, Link, LinkClass};
///
/// let page = Link::from(Url::parse("https://example.com/").unwrap());
/// let seed = page.authority();
///
/// let internal = page.resolve("/about").unwrap();
/// assert_eq!(classify(&internal, seed), LinkClass::SameDomain);
///
/// let external = page.resolve("https://cdn.example.org/x").unwrap();
/// assert_eq!(classify(&external, seed), LinkClass::CrossDomain);
///
/// let mail = page.resolve("mailto:someone@example.com").unwrap();
/// assert_eq!(classify(&mail, seed), LinkClass::Excluded);
/// ```
pub fn classify(link: &Link, seed: &Authority) -> LinkClass {
    let url = link.url();
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return LinkClass::Excluded;
    }

    if link.authority() == seed {
        LinkClass::SameDomain
    } else {
        LinkClass::CrossDomain
    }
}
