//! Minimal HTTP client for fetching pages as text, with safe logging.
//!
//! - Per-request options: extra headers, timeout, retry budget
//! - A fixed `User-Agent` attached to every request (some servers reject
//!   the default or an empty agent)
//! - Failures are classified: timeout, connect, other transport, or a
//!   non-success status that keeps its code
//! - Retries are opt-in; when enabled, 429/5xx and transport failures back
//!   off exponentially and honour `Retry-After`
//! - Optional *raw* response logging via `LIM_HTTP_RAW=1` (target `http.raw`)
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), lim_http::HttpError> {
//! let client = lim_http::HttpClient::new("https://en.wikipedia.org")?
//!     .with_user_agent("lim/0.1")?;
//! let html = client
//!     .get_text("wiki/Cat", lim_http::RequestOpts::default())
//!     .await?;
//! assert!(!html.is_empty());
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Url};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

pub use reqwest::StatusCode;

const RAW_ENV: &str = "LIM_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;
/// Upper bound on any single wait between attempts, whether it comes from
/// `Retry-After` or from exponential backoff.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status {
        status: StatusCode,
        url: String,
        body_snippet: String,
    },
}

impl HttpError {
    /// Status code for non-success responses, `None` for transport failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            HttpError::Timeout(timeout)
        } else if err.is_connect() {
            HttpError::Connect(err.to_string())
        } else {
            HttpError::Network(err.to_string())
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            HttpError::Timeout(_) | HttpError::Connect(_) | HttpError::Network(_) => true,
            HttpError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            HttpError::Url(_) | HttpError::Build(_) => false,
        }
    }
}

// ==============================
// Request options
// ==============================

/// Per-request tuning knobs.
///
/// ```
/// use lim_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(3)),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 3);
/// assert!(opts.retries.is_none());
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    user_agent: Option<HeaderValue>,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// A trailing slash is added to the base so relative paths extend it
    /// instead of replacing its last segment.
    ///
    /// ```
    /// use lim_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://en.wikipedia.org")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// assert_eq!(client.max_retries, 0);
    /// assert_eq!(client.base().as_str(), "https://en.wikipedia.org/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let mut base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            user_agent: None,
            default_timeout: Duration::from_secs(10),
            max_retries: 0,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the `User-Agent` sent with every request.
    ///
    /// ```
    /// use lim_http::HttpClient;
    ///
    /// assert!(HttpClient::new("http://localhost").unwrap().with_user_agent("ok/1.0").is_ok());
    /// assert!(HttpClient::new("http://localhost").unwrap().with_user_agent("bad\nagent").is_err());
    /// ```
    pub fn with_user_agent(mut self, agent: &str) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(agent)
            .map_err(|e| HttpError::Build(format!("invalid User-Agent: {e}")))?;
        self.user_agent = Some(value);
        Ok(self)
    }

    /// Resolve `path` against the base (or take it verbatim when absolute
    /// URLs are allowed).
    pub fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET `path` and return the decoded body of a 2xx response.
    pub async fn get_text(&self, path: &str, opts: RequestOpts) -> Result<String, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let mut attempt = 0usize;

        loop {
            match self.get_once(&url, timeout, opts.headers.as_ref(), attempt).await {
                Ok(body) => return Ok(body),
                Err((err, retry_after)) => {
                    if err.is_retryable() && attempt < max_retries {
                        attempt += 1;
                        let delay = retry_after.unwrap_or_else(|| backoff(attempt));
                        tracing::warn!(
                            url = %url,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            error = %err,
                            "http.retrying"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(url = %url, attempt, error = %err, "http.error");
                    return Err(err);
                }
            }
        }
    }

    async fn get_once(
        &self,
        url: &Url,
        timeout: Duration,
        headers: Option<&HeaderMap>,
        attempt: usize,
    ) -> Result<String, (HttpError, Option<Duration>)> {
        let mut rb = self.inner.get(url.clone()).timeout(timeout);
        if let Some(agent) = &self.user_agent {
            rb = rb.header(USER_AGENT, agent.clone());
        }
        if let Some(hdrs) = headers {
            rb = rb.headers(hdrs.clone());
        }

        tracing::debug!(
            attempt = attempt + 1,
            host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms = timeout.as_millis() as u64,
            has_user_agent = self.user_agent.is_some(),
            "http.request.start"
        );

        let t0 = Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|e| (HttpError::from_transport(e, timeout), None))?;
        let status = resp.status();
        let retry_after = retry_after_delay(resp.headers());
        let body = resp
            .text()
            .await
            .map_err(|e| (HttpError::from_transport(e, timeout), None))?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = body.len(),
            "http.response"
        );

        if raw_enabled() {
            let truncated = body.len() > RAW_MAX_BODY;
            tracing::info!(
                target: "http.raw",
                url = %url,
                %status,
                duration_ms = dur_ms,
                body = %truncate_on_char(&body, RAW_MAX_BODY),
                truncated
            );
        }

        if status.is_success() {
            return Ok(body);
        }

        Err((
            HttpError::Status {
                status,
                url: url.to_string(),
                body_snippet: snip_body(&body),
            },
            retry_after,
        ))
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(16) as u32;
    Duration::from_millis(200u64.saturating_mul(1u64 << shift)).min(MAX_RETRY_DELAY)
}

fn retry_after_delay(h: &HeaderMap) -> Option<Duration> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
        .map(|secs: u64| Duration::from_secs(secs).min(MAX_RETRY_DELAY))
}

fn truncate_on_char(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn snip_body(body: &str) -> String {
    let mut snip = truncate_on_char(body, SNIPPET_MAX).to_string();
    if snip.len() < body.len() {
        snip.push_str("...");
    }
    snip
}
