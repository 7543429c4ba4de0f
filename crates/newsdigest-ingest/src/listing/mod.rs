//! Listing sources: turn a search term into ordered [`CandidateItem`]s.

mod google_news;
mod news_page;
mod serpapi;
mod timestamp;

use std::future::Future;

use newsdigest_core::{AppConfig, CandidateItem, ListingProvider};

use crate::error::IngestError;

pub use google_news::GoogleNewsRssListing;
pub use news_page::NewsPageListing;
pub use serpapi::SerpApiListing;
pub use timestamp::parse_published_at;

/// An external source of candidate news items.
///
/// Implementations return items in source order, at most `limit` of them,
/// with locked items and unparseable timestamps already removed. An `Err`
/// means the listing call itself failed and the topic has nothing to process.
pub trait ListingSource: Send + Sync {
    fn fetch_listing(
        &self,
        term: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CandidateItem>, IngestError>> + Send;
}

/// The listing source selected by `NEWSDIGEST_LISTING_PROVIDER`.
pub enum ConfiguredListing {
    SerpApi(SerpApiListing),
    NewsPage(NewsPageListing),
    GoogleNewsRss(GoogleNewsRssListing),
}

impl ConfiguredListing {
    /// Build the configured provider with the shared timeout, user agent
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Provider`] if `SerpApi` is selected without an
    /// API key, or any construction error from the provider itself.
    pub fn from_config(config: &AppConfig) -> Result<Self, IngestError> {
        let timeout = config.listing_timeout_secs;
        let retries = config.listing_max_retries;
        let backoff = config.listing_backoff_base_ms;

        let listing = match config.listing_provider {
            ListingProvider::SerpApi => {
                let api_key = config.serpapi_api_key.as_deref().ok_or_else(|| {
                    IngestError::Provider("SERPAPI_API_KEY is not configured".to_string())
                })?;
                Self::SerpApi(
                    SerpApiListing::with_base_url(
                        api_key,
                        &config.serpapi_base_url,
                        timeout,
                        &config.user_agent,
                    )?
                    .with_retries(retries, backoff),
                )
            }
            ListingProvider::NewsPage => Self::NewsPage(
                NewsPageListing::new(
                    &config.news_page_url,
                    &config.news_site_base,
                    timeout,
                    &config.user_agent,
                )?
                .with_retries(retries, backoff),
            ),
            ListingProvider::GoogleNewsRss => Self::GoogleNewsRss(
                GoogleNewsRssListing::new(&config.google_news_base_url, timeout, &config.user_agent)?
                    .with_retries(retries, backoff),
            ),
        };
        Ok(listing)
    }
}

impl ListingSource for ConfiguredListing {
    async fn fetch_listing(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, IngestError> {
        match self {
            Self::SerpApi(inner) => inner.fetch_listing(term, limit).await,
            Self::NewsPage(inner) => inner.fetch_listing(term, limit).await,
            Self::GoogleNewsRss(inner) => inner.fetch_listing(term, limit).await,
        }
    }
}

/// One listing row before timestamp parsing, as every provider sees it.
#[derive(Debug, Clone)]
pub(crate) struct RawListing {
    pub title: String,
    pub published_raw: String,
    pub link: String,
    pub locked: bool,
}

/// Applies the shared listing contract: drop locked rows, drop rows with
/// unparseable timestamps or missing fields, keep source order, bound by `limit`.
pub(crate) fn into_candidates(
    rows: Vec<RawListing>,
    limit: usize,
    source: &'static str,
) -> Vec<CandidateItem> {
    let mut candidates = Vec::with_capacity(rows.len().min(limit));

    for row in rows {
        if candidates.len() >= limit {
            break;
        }
        if row.locked {
            tracing::debug!(source, link = %row.link, "skipping locked listing item");
            continue;
        }
        if row.title.trim().is_empty() || row.link.trim().is_empty() {
            continue;
        }
        let Some(published_at) = parse_published_at(&row.published_raw) else {
            tracing::debug!(
                source,
                link = %row.link,
                raw = %row.published_raw,
                "dropping listing item with unparseable timestamp"
            );
            continue;
        };
        candidates.push(CandidateItem {
            title: row.title.trim().to_string(),
            published_raw: row.published_raw,
            published_at,
            link: row.link,
            locked: false,
        });
    }

    candidates
}

/// Case-insensitive headline match against a search term.
///
/// `A OR B OR C` matches any alternative. An empty term or `*` matches all.
pub(crate) fn matches_term(heading: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() || term == "*" {
        return true;
    }
    let heading = heading.to_lowercase();
    term.split(" OR ")
        .map(|alt| alt.trim().trim_matches('"').to_lowercase())
        .filter(|alt| !alt.is_empty())
        .any(|alt| heading.contains(&alt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, published: &str, locked: bool) -> RawListing {
        RawListing {
            title: title.to_string(),
            published_raw: published.to_string(),
            link: format!("https://example.com/{}", title.len()),
            locked,
        }
    }

    #[test]
    fn drops_locked_and_unparseable_rows_in_order() {
        let rows = vec![
            row("First", "10 March, 2024 10:00:00 IST", false),
            row("Locked", "10 March, 2024 10:00:00 IST", true),
            row("Bad date", "yesterday", false),
            row("Fourth!", "09 March, 2024 10:00:00 IST", false),
        ];
        let items = into_candidates(rows, 10, "test");
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Fourth!"]);
        assert!(items.iter().all(|i| !i.locked));
    }

    #[test]
    fn bounds_result_count_after_filtering() {
        let rows = vec![
            row("Locked", "10 March, 2024 10:00:00", true),
            row("A", "10 March, 2024 10:00:00", false),
            row("BB", "10 March, 2024 10:00:00", false),
            row("CCC", "10 March, 2024 10:00:00", false),
        ];
        let items = into_candidates(rows, 2, "test");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[1].title, "BB");
    }

    #[test]
    fn drops_rows_without_link() {
        let mut r = row("No link", "10 March, 2024 10:00:00", false);
        r.link = String::new();
        assert!(into_candidates(vec![r], 5, "test").is_empty());
    }

    #[test]
    fn matches_term_any_alternative() {
        assert!(matches_term(
            "Ethylene oxide capacity expands in Gujarat",
            "specialty chemicals OR ethylene oxide"
        ));
        assert!(!matches_term("Steel prices fall", "specialty chemicals OR ethylene oxide"));
    }

    #[test]
    fn matches_term_empty_or_wildcard_matches_all() {
        assert!(matches_term("Anything", ""));
        assert!(matches_term("Anything", "*"));
    }

    #[test]
    fn matches_term_is_case_insensitive() {
        assert!(matches_term("basf raises prices", "BASF"));
    }
}
