//! Lookup error taxonomy.
//!
//! Transport errors from `lim-http` collapse into [`FetchError`]; its
//! [`FetchErrorKind`] keeps enough classification for callers to tell a
//! missing article apart from every other failure.

use lim_http::{HttpError, StatusCode};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// The query was empty after trimming. Raised before any network access.
    #[error("query is empty after trimming whitespace")]
    InvalidQuery,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The page did not have the expected structure.
    #[error("could not parse page: {0}")]
    Parse(String),

    #[error("lookup cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// HTTP 404.
    NotFound,
    /// Any other non-success status.
    Status(u16),
    Timeout,
    Connect,
    Other,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::NotFound => f.write_str("not found (404)"),
            FetchErrorKind::Status(code) => write!(f, "HTTP {code}"),
            FetchErrorKind::Timeout => f.write_str("timeout"),
            FetchErrorKind::Connect => f.write_str("connection failure"),
            FetchErrorKind::Other => f.write_str("network failure"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        let kind = match (err.status(), &err) {
            (Some(status), _) if status == StatusCode::NOT_FOUND => FetchErrorKind::NotFound,
            (Some(status), _) => FetchErrorKind::Status(status.as_u16()),
            (None, HttpError::Timeout(_)) => FetchErrorKind::Timeout,
            (None, HttpError::Connect(_)) => FetchErrorKind::Connect,
            (None, _) => FetchErrorKind::Other,
        };
        FetchError {
            kind,
            message: err.to_string(),
        }
    }
}

impl LookupError {
    pub fn fetch_kind(&self) -> Option<FetchErrorKind> {
        match self {
            LookupError::Fetch(e) => Some(e.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.fetch_kind() == Some(FetchErrorKind::NotFound)
    }

    /// Message suitable for showing to the person who asked.
    ///
    /// ```
    /// use lim_wiki::{FetchError, FetchErrorKind, LookupError};
    ///
    /// let err = LookupError::Fetch(FetchError {
    ///     kind: FetchErrorKind::NotFound,
    ///     message: "server returned 404".into(),
    /// });
    /// assert_eq!(
    ///     err.user_message("Catt"),
    ///     "Wikipedia page not found for 'Catt'. Please try a different query."
    /// );
    /// ```
    pub fn user_message(&self, query: &str) -> String {
        match self {
            LookupError::InvalidQuery => {
                "Please select some meaningful text to search.".to_string()
            }
            LookupError::Fetch(e) => match e.kind {
                FetchErrorKind::NotFound => format!(
                    "Wikipedia page not found for '{}'. Please try a different query.",
                    query.trim()
                ),
                FetchErrorKind::Status(_) => format!("HTTP error occurred: {}", e.message),
                FetchErrorKind::Timeout | FetchErrorKind::Connect | FetchErrorKind::Other => {
                    format!(
                        "Network request failed (e.g., no internet connection, timeout): {}",
                        e.message
                    )
                }
            },
            LookupError::Parse(msg) => {
                format!("An unexpected error occurred during lookup: {msg}")
            }
            LookupError::Cancelled => "Lookup cancelled.".to_string(),
        }
    }
}
