use crate::error::{FetchError, LookupError};
use crate::extract::extract_summary;
use crate::query::{Query, SourceLocator};
use crate::summary::{ExtractionResult, Summary};
use lim_config::{DEFAULT_PARAGRAPH_LIMIT, DEFAULT_USER_AGENT, LookupConfig};
use lim_http::{HttpClient, HttpError, RequestOpts};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Fetches an article and reduces it to a [`ExtractionResult`].
///
/// Holds no per-call state; clones share the underlying connection pool and
/// concurrent calls are independent.
#[derive(Clone, Debug)]
pub struct SummaryExtractor {
    http: HttpClient,
    paragraph_limit: usize,
}

impl SummaryExtractor {
    /// Extractor with default user agent, timeout, and paragraph limit.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::from_config(&LookupConfig {
            base_url: base_url.to_string(),
            ..LookupConfig::default()
        })
    }

    pub fn from_config(cfg: &LookupConfig) -> Result<Self, HttpError> {
        let agent = if cfg.user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            cfg.user_agent.as_str()
        };
        let http = HttpClient::new(&cfg.base_url)?
            .with_user_agent(agent)?
            .with_timeout(cfg.timeout())
            .with_retries(cfg.retries);
        let paragraph_limit = if cfg.paragraph_limit == 0 {
            DEFAULT_PARAGRAPH_LIMIT
        } else {
            cfg.paragraph_limit
        };
        Ok(Self {
            http,
            paragraph_limit,
        })
    }

    pub fn paragraph_limit(&self) -> usize {
        self.paragraph_limit
    }

    pub fn locator_for(&self, query: &Query) -> SourceLocator {
        SourceLocator::new(self.http.base().as_str(), query)
    }

    /// Look up `raw_query` and summarise the article.
    ///
    /// Fails with [`LookupError::InvalidQuery`] before touching the network
    /// when the query is blank.
    pub async fn extract(&self, raw_query: &str) -> Result<ExtractionResult, LookupError> {
        let query = Query::parse(raw_query)?;
        let locator = self.locator_for(&query);
        let t0 = Instant::now();
        tracing::info!(query = %query, locator = %locator, "wiki.lookup.start");

        let html = self
            .http
            .get_text(
                locator.as_str(),
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| {
                let err = FetchError::from(e);
                tracing::warn!(query = %query, kind = %err.kind, "wiki.lookup.fetch_failed");
                err
            })?;

        let text = extract_summary(&html, self.paragraph_limit)?;
        drop(html);

        let result = if text.is_empty() {
            ExtractionResult::NotFound { locator }
        } else {
            ExtractionResult::Found {
                summary: Summary::new(text),
                locator,
            }
        };

        tracing::info!(
            query = %query,
            found = result.is_found(),
            summary_chars = result.summary().map(|s| s.text().chars().count()).unwrap_or(0),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "wiki.lookup.done"
        );
        Ok(result)
    }

    /// Like [`extract`](Self::extract), but gives up with
    /// [`LookupError::Cancelled`] as soon as `cancel` fires.
    pub async fn extract_with_cancel(
        &self,
        raw_query: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, LookupError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(query = %raw_query.trim(), "wiki.lookup.cancelled");
                Err(LookupError::Cancelled)
            }
            res = self.extract(raw_query) => res,
        }
    }
}
