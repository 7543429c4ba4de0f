use std::path::PathBuf;

use serde::Serialize;

/// Where candidate listings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingProvider {
    /// `SerpApi` Google News search (JSON).
    SerpApi,
    /// A publisher's HTML news index page.
    NewsPage,
    /// Google News RSS search feed.
    GoogleNewsRss,
}

impl std::fmt::Display for ListingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingProvider::SerpApi => write!(f, "serpapi"),
            ListingProvider::NewsPage => write!(f, "news_page"),
            ListingProvider::GoogleNewsRss => write!(f, "google_news_rss"),
        }
    }
}

/// Character-level similarity ratio used for near-duplicate suppression.
///
/// All variants return a value in `[0.0, 1.0]` where `1.0` means identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// `2 * matched / (len(a) + len(b))` over a character diff.
    #[default]
    Ratio,
    Levenshtein,
    JaroWinkler,
    SorensenDice,
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityMetric::Ratio => write!(f, "ratio"),
            SimilarityMetric::Levenshtein => write!(f, "levenshtein"),
            SimilarityMetric::JaroWinkler => write!(f, "jaro_winkler"),
            SimilarityMetric::SorensenDice => write!(f, "sorensen_dice"),
        }
    }
}

/// Immutable run configuration, built once at startup and handed to the
/// pipeline at construction.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub listing_provider: ListingProvider,
    pub serpapi_api_key: Option<String>,
    pub serpapi_base_url: String,
    pub news_page_url: String,
    pub news_site_base: String,
    pub google_news_base_url: String,
    pub industry_query: String,
    pub companies_path: PathBuf,
    /// Comma-separated override for the companies file.
    pub companies_override: Option<Vec<String>>,
    pub item_timeout_secs: u64,
    pub listing_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
    pub listing_max_retries: u32,
    pub listing_backoff_base_ms: u64,
    pub dedup_threshold: f64,
    pub similarity_metric: SimilarityMetric,
    /// Compare lowercased text, for both exact and near-duplicate checks.
    pub dedup_ignore_case: bool,
    pub industry_result_count: usize,
    pub company_result_count: usize,
    pub company_record_cap: usize,
    pub window_days: u64,
    pub min_content_len: usize,
    pub truncation_window: usize,
    pub strip_chars: String,
    pub relevance_keywords: Vec<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub summary_model: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("listing_provider", &self.listing_provider)
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("serpapi_base_url", &self.serpapi_base_url)
            .field("news_page_url", &self.news_page_url)
            .field("news_site_base", &self.news_site_base)
            .field("google_news_base_url", &self.google_news_base_url)
            .field("industry_query", &self.industry_query)
            .field("companies_path", &self.companies_path)
            .field("companies_override", &self.companies_override)
            .field("item_timeout_secs", &self.item_timeout_secs)
            .field("listing_timeout_secs", &self.listing_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .field("listing_max_retries", &self.listing_max_retries)
            .field("listing_backoff_base_ms", &self.listing_backoff_base_ms)
            .field("dedup_threshold", &self.dedup_threshold)
            .field("similarity_metric", &self.similarity_metric)
            .field("dedup_ignore_case", &self.dedup_ignore_case)
            .field("industry_result_count", &self.industry_result_count)
            .field("company_result_count", &self.company_result_count)
            .field("company_record_cap", &self.company_record_cap)
            .field("window_days", &self.window_days)
            .field("min_content_len", &self.min_content_len)
            .field("truncation_window", &self.truncation_window)
            .field("strip_chars", &self.strip_chars)
            .field("relevance_keywords", &self.relevance_keywords)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("summary_model", &self.summary_model)
            .finish()
    }
}
