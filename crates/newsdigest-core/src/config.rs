use crate::app_config::{AppConfig, ListingProvider, SimilarityMetric};
use crate::ConfigError;

const DEFAULT_INDUSTRY_QUERY: &str = "specialty chemicals OR non-ionic surfactants OR ethylene oxide \
     OR green chemistry OR bio-based intermediates OR tariffs OR regulation OR supply chain";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load application configuration through an arbitrary key lookup, such as
/// a `HashMap` in tests or a layered source in embedding applications.
///
/// # Errors
///
/// Returns `ConfigError` if required keys are missing or values are invalid.
pub fn load_app_config_with<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    build_app_config(lookup)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
#[allow(clippy::too_many_lines)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected true or false, got '{other}'"))),
        }
    };

    let listing_provider = parse_listing_provider(&or_default(
        "NEWSDIGEST_LISTING_PROVIDER",
        "serpapi",
    ))?;

    let serpapi_api_key = optional("SERPAPI_API_KEY");
    if listing_provider == ListingProvider::SerpApi && serpapi_api_key.is_none() {
        return Err(ConfigError::MissingEnvVar("SERPAPI_API_KEY".to_string()));
    }

    let log_level = or_default("NEWSDIGEST_LOG_LEVEL", "info");
    let serpapi_base_url = or_default("NEWSDIGEST_SERPAPI_BASE_URL", "https://serpapi.com/");
    let news_page_url = or_default(
        "NEWSDIGEST_NEWS_PAGE_URL",
        "https://www.chemicalweekly.com/news",
    );
    let news_site_base = or_default("NEWSDIGEST_NEWS_SITE_BASE", "https://chemicalweekly.com");
    let google_news_base_url = or_default(
        "NEWSDIGEST_GOOGLE_NEWS_BASE_URL",
        "https://news.google.com/",
    );
    let industry_query = or_default("NEWSDIGEST_INDUSTRY_QUERY", DEFAULT_INDUSTRY_QUERY);
    let companies_path = PathBuf::from(or_default(
        "NEWSDIGEST_COMPANIES_PATH",
        "./config/companies.yaml",
    ));
    let companies_override = optional("NEWSDIGEST_COMPANIES").map(|raw| split_list(&raw));

    let item_timeout_secs = parse_u64("NEWSDIGEST_ITEM_TIMEOUT_SECS", "20")?;
    if item_timeout_secs == 0 {
        return Err(invalid(
            "NEWSDIGEST_ITEM_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let listing_timeout_secs = parse_u64("NEWSDIGEST_LISTING_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "NEWSDIGEST_USER_AGENT",
        "newsdigest/0.1 (weekly-industry-digest)",
    );
    let max_concurrent_fetches = parse_positive("NEWSDIGEST_MAX_CONCURRENT_FETCHES", "5")?;
    let listing_max_retries = parse_u32("NEWSDIGEST_LISTING_MAX_RETRIES", "2")?;
    let listing_backoff_base_ms = parse_u64("NEWSDIGEST_LISTING_BACKOFF_BASE_MS", "500")?;

    let dedup_threshold = parse_threshold(&or_default("NEWSDIGEST_DEDUP_THRESHOLD", "0.85"))?;
    let similarity_metric =
        parse_similarity_metric(&or_default("NEWSDIGEST_SIMILARITY_METRIC", "ratio"))?;
    let dedup_ignore_case = parse_bool("NEWSDIGEST_DEDUP_IGNORE_CASE", "false")?;

    let industry_result_count = parse_positive("NEWSDIGEST_INDUSTRY_RESULT_COUNT", "15")?;
    let company_result_count = parse_positive("NEWSDIGEST_COMPANY_RESULT_COUNT", "5")?;
    let company_record_cap = parse_positive("NEWSDIGEST_COMPANY_RECORD_CAP", "3")?;

    let window_days = parse_u64("NEWSDIGEST_WINDOW_DAYS", "7")?;

    let min_content_len = parse_usize("NEWSDIGEST_MIN_CONTENT_LEN", "20")?;
    let truncation_window = parse_positive("NEWSDIGEST_TRUNCATION_WINDOW", "1024")?;
    let strip_chars = or_default("NEWSDIGEST_STRIP_CHARS", "?");
    let relevance_keywords = optional("NEWSDIGEST_RELEVANCE_KEYWORDS")
        .map(|raw| split_list(&raw))
        .unwrap_or_default();

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("NEWSDIGEST_OPENAI_BASE_URL", "https://api.openai.com/");
    let summary_model = or_default("NEWSDIGEST_SUMMARY_MODEL", "gpt-4o-mini");

    Ok(AppConfig {
        log_level,
        listing_provider,
        serpapi_api_key,
        serpapi_base_url,
        news_page_url,
        news_site_base,
        google_news_base_url,
        industry_query,
        companies_path,
        companies_override,
        item_timeout_secs,
        listing_timeout_secs,
        user_agent,
        max_concurrent_fetches,
        listing_max_retries,
        listing_backoff_base_ms,
        dedup_threshold,
        similarity_metric,
        dedup_ignore_case,
        industry_result_count,
        company_result_count,
        company_record_cap,
        window_days,
        min_content_len,
        truncation_window,
        strip_chars,
        relevance_keywords,
        openai_api_key,
        openai_base_url,
        summary_model,
    })
}

fn parse_listing_provider(s: &str) -> Result<ListingProvider, ConfigError> {
    match s.trim() {
        "serpapi" => Ok(ListingProvider::SerpApi),
        "news_page" => Ok(ListingProvider::NewsPage),
        "google_news_rss" => Ok(ListingProvider::GoogleNewsRss),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSDIGEST_LISTING_PROVIDER".to_string(),
            reason: format!(
                "unknown provider '{other}'; expected serpapi, news_page or google_news_rss"
            ),
        }),
    }
}

fn parse_similarity_metric(s: &str) -> Result<SimilarityMetric, ConfigError> {
    match s.trim() {
        "ratio" => Ok(SimilarityMetric::Ratio),
        "levenshtein" => Ok(SimilarityMetric::Levenshtein),
        "jaro_winkler" => Ok(SimilarityMetric::JaroWinkler),
        "sorensen_dice" => Ok(SimilarityMetric::SorensenDice),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSDIGEST_SIMILARITY_METRIC".to_string(),
            reason: format!(
                "unknown metric '{other}'; expected ratio, levenshtein, jaro_winkler or sorensen_dice"
            ),
        }),
    }
}

fn parse_threshold(s: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "NEWSDIGEST_DEDUP_THRESHOLD".to_string(),
        reason,
    };
    let value = s.trim().parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{value} is outside [0.0, 1.0]")));
    }
    Ok(value)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
