//! Publisher news-index page listing.
//!
//! The page is a grid of cards: `div.card > a[href]` wrapping an `h5`
//! headline and a `p.card-footer` timestamp. Paywalled stories carry a
//! `bi-lock` icon inside the headline.

use std::sync::LazyLock;
use std::time::Duration;

use newsdigest_core::CandidateItem;
use regex::Regex;
use reqwest::{Client, Url};

use super::{into_candidates, matches_term, ListingSource, RawListing};
use crate::error::IngestError;
use crate::retry::retry_with_backoff;

const SOURCE: &str = "news_page";

static CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*class\s*=\s*["'][^"']*\bcard\b[^"']*["'][^>]*>\s*<a[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#,
    )
    .expect("valid card regex")
});

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h5[^>]*>(.*?)</h5>").expect("valid h5 regex"));

static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p[^>]*class\s*=\s*["'][^"']*card-footer[^"']*["'][^>]*>(.*?)</p>"#)
        .expect("valid footer regex")
});

static LOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbi-lock\b").expect("valid lock regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));

/// Scrapes a news index page and filters its cards by headline.
pub struct NewsPageListing {
    client: Client,
    page_url: String,
    site_base: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NewsPageListing {
    /// `site_base` resolves relative card links such as `/news/123`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the client cannot be built, or
    /// [`IngestError::InvalidUrl`] if `site_base` does not parse.
    pub fn new(
        page_url: &str,
        site_base: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let site_base = Url::parse(site_base).map_err(|e| IngestError::InvalidUrl {
            url: site_base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            page_url: page_url.to_string(),
            site_base,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    async fn fetch_page(&self) -> Result<String, IngestError> {
        let response = self.client.get(&self.page_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.page_url.clone(),
            });
        }
        Ok(response.text().await?)
    }
}

impl ListingSource for NewsPageListing {
    async fn fetch_listing(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, IngestError> {
        let html = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_page()
        })
        .await?;

        let cards = parse_cards(&html, &self.site_base);
        if cards.is_empty() {
            return Err(IngestError::Provider(format!(
                "no news cards found at {}",
                self.page_url
            )));
        }

        let rows = cards
            .into_iter()
            .filter(|card| matches_term(&card.title, term))
            .collect();
        let candidates = into_candidates(rows, limit, SOURCE);
        tracing::debug!(term, count = candidates.len(), "news page listing parsed");
        Ok(candidates)
    }
}

/// Extract every card on the page, locked ones included.
pub(crate) fn parse_cards(html: &str, site_base: &Url) -> Vec<RawListing> {
    CARD_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let href = cap.get(1)?.as_str().trim();
            let inner = cap.get(2)?.as_str();

            let heading_html = HEADING_RE.captures(inner)?.get(1)?.as_str();
            let footer_html = FOOTER_RE.captures(inner)?.get(1)?.as_str();
            let link = site_base.join(href).ok()?.to_string();

            Some(RawListing {
                title: inline_text(heading_html),
                published_raw: inline_text(footer_html),
                link,
                locked: LOCK_RE.is_match(heading_html),
            })
        })
        .collect()
}

fn inline_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
