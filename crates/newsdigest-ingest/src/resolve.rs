//! Per-item page resolution with isolated failures.
//!
//! Every candidate produces exactly one [`ResolvedItem`]. Timeouts, network
//! errors, bad statuses and missing metadata are recorded on the item and
//! never abort the batch.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use newsdigest_core::{CandidateItem, FetchErrorKind, ResolvedItem};
use reqwest::Client;

use crate::error::IngestError;
use crate::extract::extract_description;

/// Fetches article pages with bounded concurrency and a per-item timeout.
pub struct ContentResolver {
    client: Client,
    item_timeout: Duration,
    max_concurrent: usize,
}

impl ContentResolver {
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying client cannot be built.
    pub fn new(
        item_timeout_secs: u64,
        max_concurrent: usize,
        user_agent: &str,
    ) -> Result<Self, IngestError> {
        Self::with_timeout(
            Duration::from_secs(item_timeout_secs),
            max_concurrent,
            user_agent,
        )
    }

    /// Like [`ContentResolver::new`] with sub-second timeout resolution.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying client cannot be built.
    pub fn with_timeout(
        item_timeout: Duration,
        max_concurrent: usize,
        user_agent: &str,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .connect_timeout(item_timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            item_timeout,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Resolve every candidate, returning results in input order.
    ///
    /// Fetches run through a buffered stream of at most `max_concurrent`
    /// in-flight requests; each result is written into the slot of its
    /// original index, so completion order never leaks into the output.
    pub async fn resolve_all(&self, candidates: Vec<CandidateItem>) -> Vec<ResolvedItem> {
        let total = candidates.len();
        let mut slots: Vec<Option<ResolvedItem>> = vec![None; total];

        let mut in_flight = stream::iter(candidates.into_iter().enumerate())
            .map(|(idx, candidate)| async move { (idx, self.resolve(candidate).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((idx, resolved)) = in_flight.next().await {
            slots[idx] = Some(resolved);
        }

        let resolved: Vec<ResolvedItem> = slots.into_iter().flatten().collect();
        let failed = resolved.iter().filter(|r| r.fetch_error.is_some()).count();
        if failed > 0 {
            tracing::warn!(total, failed, "some article pages could not be resolved");
        }
        resolved
    }

    /// Resolve one candidate. Never fails; failures land in `fetch_error`.
    pub async fn resolve(&self, candidate: CandidateItem) -> ResolvedItem {
        match tokio::time::timeout(self.item_timeout, self.fetch_description(&candidate.link)).await
        {
            Ok(Ok(content)) => ResolvedItem::ok(candidate, content),
            Ok(Err(kind)) => {
                tracing::debug!(url = %candidate.link, error = %kind, "article resolution failed");
                ResolvedItem::failed(candidate, kind)
            }
            Err(_) => {
                tracing::debug!(
                    url = %candidate.link,
                    timeout_ms = self.item_timeout.as_millis(),
                    "article fetch timed out"
                );
                ResolvedItem::failed(candidate, FetchErrorKind::Timeout)
            }
        }
    }

    async fn fetch_description(&self, url: &str) -> Result<String, FetchErrorKind> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::Status(status.as_u16()));
        }

        let html = response.text().await.map_err(classify)?;
        extract_description(&html).ok_or(FetchErrorKind::MissingMetadata)
    }
}

fn classify(err: reqwest::Error) -> FetchErrorKind {
    if err.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::Network(err.to_string())
    }
}
