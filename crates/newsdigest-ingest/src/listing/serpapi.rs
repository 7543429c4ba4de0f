//! `SerpApi` Google News search listing.

use std::time::Duration;

use newsdigest_core::CandidateItem;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{into_candidates, ListingSource, RawListing};
use crate::error::IngestError;
use crate::retry::retry_with_backoff;

const SOURCE: &str = "serpapi";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news_results: Vec<NewsResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    iso_date: Option<String>,
}

/// Client for `SerpApi`'s `search.json` endpoint with `tbm=nws`.
///
/// Use [`SerpApiListing::with_base_url`] to point at a mock server in tests.
pub struct SerpApiListing {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SerpApiListing {
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`IngestError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so `join` appends rather than replaces.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| IngestError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enable retries on transient listing failures.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn search_url(&self, term: &str, limit: usize) -> Result<Url, IngestError> {
        let mut url = self
            .base_url
            .join("search.json")
            .map_err(|e| IngestError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("engine", "google")
            .append_pair("q", term)
            .append_pair("tbm", "nws")
            .append_pair("tbs", "qdr:d7")
            .append_pair("num", &limit.to_string())
            .append_pair("api_key", &self.api_key);
        Ok(url)
    }

    async fn search_once(&self, url: &Url) -> Result<SearchResponse, IngestError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| IngestError::Deserialize {
            context: "serpapi search response".to_string(),
            source,
        })
    }
}

impl ListingSource for SerpApiListing {
    async fn fetch_listing(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, IngestError> {
        let url = self.search_url(term, limit)?;
        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.search_once(&url)
        })
        .await?;

        if let Some(error) = response.error {
            return Err(IngestError::Provider(error));
        }

        let rows = response
            .news_results
            .into_iter()
            .map(|result| RawListing {
                title: result.title,
                // Prefer the machine-readable timestamp when the engine provides one.
                published_raw: result.iso_date.or(result.date).unwrap_or_default(),
                link: result.link,
                locked: false,
            })
            .collect();

        let candidates = into_candidates(rows, limit, SOURCE);
        tracing::debug!(term, count = candidates.len(), "serpapi listing fetched");
        Ok(candidates)
    }
}

/// Strips the API key from a URL before it lands in an error message.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "api_key" {
                (k.into_owned(), "[redacted]".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
