// Base endpoint handling
//
// Every client stores its base URL as an `Endpoint`, which guarantees a
// single trailing slash so relative API paths can be appended verbatim.

use std::fmt;

use url::Url;

use crate::error::Error;

/// A normalized base URL that always ends with exactly one `/`.
///
/// Scheme and host are not validated here; that happens when a request
/// URL is built with [`Endpoint::url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Normalize `base` so it ends with exactly one `/`.
    ///
    /// Idempotent: `Endpoint::new(Endpoint::new(x).as_str()) == Endpoint::new(x)`.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        let trimmed = base.trim_end_matches('/').len();
        base.truncate(trimmed);
        base.push('/');
        Self(base)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative API path: `{endpoint}{path}`.
    ///
    /// Leading slashes on `path` are dropped so the result never contains
    /// `//` at the seam.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path.trim_start_matches('/'))
    }

    /// Build and parse a full request URL for `path`.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&self.join(path))?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

impl From<String> for Endpoint {
    fn from(base: String) -> Self {
        Self::new(base)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
