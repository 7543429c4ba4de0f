//! Data model flowing through the pipeline, leaves first:
//! [`CandidateItem`] → [`ResolvedItem`] → [`NormalizedItem`] → [`Record`].

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Summary used for any topic that ends a run with no usable records.
pub const NO_MATERIAL_DEVELOPMENTS: &str = "No material developments this week.";

/// One raw listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateItem {
    pub title: String,
    /// Timestamp exactly as the listing source formatted it.
    pub published_raw: String,
    pub published_at: DateTime<FixedOffset>,
    /// Absolute URL.
    pub link: String,
    /// Paywalled or otherwise restricted. Locked items never leave the fetcher.
    pub locked: bool,
}

impl CandidateItem {
    /// Calendar date of publication, normalized to UTC.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.published_at.with_timezone(&Utc).date_naive()
    }
}

/// Why a page could not supply content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum FetchErrorKind {
    Timeout,
    Network(String),
    Status(u16),
    MissingMetadata,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Timeout => write!(f, "timed out"),
            FetchErrorKind::Network(reason) => write!(f, "network error: {reason}"),
            FetchErrorKind::Status(code) => write!(f, "unexpected HTTP status {code}"),
            FetchErrorKind::MissingMetadata => write!(f, "no description metadata"),
        }
    }
}

/// A candidate with fetched (or failed) page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub candidate: CandidateItem,
    /// Empty whenever `fetch_error` is set.
    pub raw_content: String,
    pub fetch_error: Option<FetchErrorKind>,
}

impl ResolvedItem {
    #[must_use]
    pub fn ok(candidate: CandidateItem, raw_content: String) -> Self {
        Self {
            candidate,
            raw_content,
            fetch_error: None,
        }
    }

    #[must_use]
    pub fn failed(candidate: CandidateItem, error: FetchErrorKind) -> Self {
        Self {
            candidate,
            raw_content: String::new(),
            fetch_error: Some(error),
        }
    }
}

/// A resolved item whose content passed cleaning and the minimum-length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedItem {
    pub candidate: CandidateItem,
    pub clean_content: String,
}

impl NormalizedItem {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.candidate.date()
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        let date = self.date();
        Record {
            heading: self.candidate.title,
            date,
            link: self.candidate.link,
            content: self.clean_content,
        }
    }
}

/// Final unit handed to summarization and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub heading: String,
    pub date: NaiveDate,
    /// Unique within a run.
    pub link: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    Industry,
    Company,
}

impl std::fmt::Display for TopicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicKind::Industry => write!(f, "industry"),
            TopicKind::Company => write!(f, "company"),
        }
    }
}

/// How a topic's sub-run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum TopicStatus {
    Ok,
    /// The listing succeeded but nothing usable survived the pipeline.
    NoItems,
    /// The listing call itself failed; siblings were unaffected.
    ListingUnavailable(String),
}

/// Output for one topic. `summary` is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct TopicDigest {
    pub topic: String,
    pub kind: TopicKind,
    pub status: TopicStatus,
    pub records: Vec<Record>,
    pub summary: String,
}

impl TopicDigest {
    /// A digest with no records and the placeholder summary.
    #[must_use]
    pub fn empty(topic: impl Into<String>, kind: TopicKind, status: TopicStatus) -> Self {
        Self {
            topic: topic.into(),
            kind,
            status,
            records: Vec::new(),
            summary: NO_MATERIAL_DEVELOPMENTS.to_string(),
        }
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct DigestReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub industry: TopicDigest,
    pub companies: Vec<TopicDigest>,
}

impl DigestReport {
    /// All records in report order: industry first, then companies.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.industry
            .records
            .iter()
            .chain(self.companies.iter().flat_map(|c| c.records.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(published: &str) -> CandidateItem {
        CandidateItem {
            title: "Heading".to_string(),
            published_raw: published.to_string(),
            published_at: DateTime::parse_from_rfc3339(published).expect("valid rfc3339"),
            link: "https://example.com/a".to_string(),
            locked: false,
        }
    }

    #[test]
    fn candidate_date_is_normalized_to_utc() {
        // 02:00 IST on the 10th is 20:30 UTC on the 9th.
        let item = candidate("2024-03-10T02:00:00+05:30");
        assert_eq!(item.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn failed_resolution_has_empty_content() {
        let resolved = ResolvedItem::failed(candidate("2024-03-10T10:00:00Z"), FetchErrorKind::Timeout);
        assert!(resolved.raw_content.is_empty());
        assert_eq!(resolved.fetch_error, Some(FetchErrorKind::Timeout));
    }

    #[test]
    fn into_record_carries_heading_link_and_content() {
        let item = NormalizedItem {
            candidate: candidate("2024-03-10T10:00:00Z"),
            clean_content: "Plant capacity doubles.".to_string(),
        };
        let record = item.into_record();
        assert_eq!(record.heading, "Heading");
        assert_eq!(record.link, "https://example.com/a");
        assert_eq!(record.content, "Plant capacity doubles.");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn empty_topic_uses_placeholder_summary() {
        let digest = TopicDigest::empty("BASF", TopicKind::Company, TopicStatus::NoItems);
        assert_eq!(digest.summary, NO_MATERIAL_DEVELOPMENTS);
        assert!(digest.records.is_empty());
    }

    #[test]
    fn topic_status_serializes_with_reason() {
        let json = serde_json::to_value(TopicStatus::ListingUnavailable("boom".to_string()))
            .expect("serializable");
        assert_eq!(json["state"], "listing_unavailable");
        assert_eq!(json["reason"], "boom");
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(FetchErrorKind::Status(404).to_string(), "unexpected HTTP status 404");
        assert_eq!(FetchErrorKind::Timeout.to_string(), "timed out");
    }
}
