//! Query normalisation and article locators.

use crate::error::LookupError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;

/// Everything but RFC 3986 unreserved characters gets escaped, including `/`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A topic name, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::InvalidQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single-pass percent-encoding as one path segment.
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.0, PATH_SEGMENT).to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The article URL a query resolves to: `{base}/wiki/{encoded query}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// `base` is a scheme + host (optionally with a path prefix).
    ///
    /// ```
    /// use lim_wiki::{Query, SourceLocator};
    ///
    /// let q = Query::parse("C++").unwrap();
    /// let loc = SourceLocator::new("https://en.wikipedia.org/", &q);
    /// assert_eq!(loc.as_str(), "https://en.wikipedia.org/wiki/C%2B%2B");
    /// ```
    pub fn new(base: &str, query: &Query) -> Self {
        let base = base.trim_end_matches('/');
        Self(format!("{base}/wiki/{}", query.encoded()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
