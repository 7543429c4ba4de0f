//! Digest orchestration: one industry sub-run plus one sub-run per company.
//!
//! Each sub-run executes listing → resolve → normalize → relevance → dedup,
//! then the industry pool is window-filtered against a cutoff taken from the
//! whole listing and company pools are capped by count. A failed listing call ends only its own sub-run. After all
//! sub-runs a run-level pass keeps links and content unique across topics,
//! and every topic is summarized.

use chrono::Utc;
use newsdigest_core::{
    AppConfig, CandidateItem, CompanyConfig, DigestReport, NormalizedItem, Record, TopicDigest,
    TopicKind, TopicStatus, NO_MATERIAL_DEVELOPMENTS,
};
use uuid::Uuid;

use crate::dedup::Deduplicator;
use crate::error::IngestError;
use crate::listing::ListingSource;
use crate::normalize::Normalizer;
use crate::relevance::{KeywordFilter, RelevanceFilter};
use crate::resolve::ContentResolver;
use crate::summary::{LeadSummarizer, Summarizer};
use crate::window::WindowFilter;

/// The full ingestion pipeline, built once per run from an immutable config.
pub struct Pipeline<L, S> {
    config: AppConfig,
    listing: L,
    resolver: ContentResolver,
    normalizer: Normalizer,
    relevance: Box<dyn RelevanceFilter>,
    dedup: Deduplicator,
    window: WindowFilter,
    summarizer: S,
    lead: LeadSummarizer,
}

impl<L: ListingSource, S: Summarizer> Pipeline<L, S> {
    /// Build every stage from `config`. The relevance filter defaults to the
    /// configured keyword list, which accepts everything when empty.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the page-fetch client cannot be built.
    pub fn new(config: AppConfig, listing: L, summarizer: S) -> Result<Self, IngestError> {
        let resolver = ContentResolver::new(
            config.item_timeout_secs,
            config.max_concurrent_fetches,
            &config.user_agent,
        )?;
        let normalizer = Normalizer::from_config(&config);
        Ok(Self {
            resolver,
            relevance: Box::new(KeywordFilter::new(&config.relevance_keywords)),
            dedup: Deduplicator::from_config(&config),
            window: WindowFilter::from_config(&config),
            lead: LeadSummarizer::new(normalizer.clone()),
            normalizer,
            config,
            listing,
            summarizer,
        })
    }

    #[must_use]
    pub fn with_relevance(mut self, filter: impl RelevanceFilter + 'static) -> Self {
        self.relevance = Box::new(filter);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: ContentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the industry topic and every company topic, in order.
    pub async fn run(&self, companies: &[CompanyConfig]) -> DigestReport {
        let run_id = Uuid::new_v4();
        tracing::info!(
            %run_id,
            companies = companies.len(),
            provider = %self.config.listing_provider,
            "starting digest run"
        );

        let mut industry = self
            .run_topic(
                &self.config.industry_query,
                &self.config.industry_query,
                TopicKind::Industry,
            )
            .await;

        let mut company_digests = Vec::with_capacity(companies.len());
        for company in companies {
            let digest = self
                .run_topic(&company.name, company.search_term(), TopicKind::Company)
                .await;
            company_digests.push(digest);
        }

        let dropped = {
            let mut groups: Vec<&mut Vec<Record>> = std::iter::once(&mut industry.records)
                .chain(company_digests.iter_mut().map(|d| &mut d.records))
                .collect();
            self.dedup.dedup_across(&mut groups)
        };
        if dropped > 0 {
            tracing::info!(%run_id, dropped, "removed records repeated across topics");
        }

        self.summarize(&mut industry).await;
        for digest in &mut company_digests {
            self.summarize(digest).await;
        }

        let report = DigestReport {
            run_id,
            generated_at: Utc::now(),
            industry,
            companies: company_digests,
        };
        tracing::info!(
            %run_id,
            records = report.records().count(),
            "digest run complete"
        );
        report
    }

    /// One sub-run. Never fails: a listing failure becomes
    /// [`TopicStatus::ListingUnavailable`] with the placeholder summary.
    pub async fn run_topic(&self, topic: &str, term: &str, kind: TopicKind) -> TopicDigest {
        match self.collect_records(term, kind).await {
            Ok(records) if records.is_empty() => {
                tracing::info!(topic, %kind, "no usable items for topic");
                TopicDigest::empty(topic, kind, TopicStatus::NoItems)
            }
            Ok(records) => {
                tracing::info!(topic, %kind, records = records.len(), "topic collected");
                TopicDigest {
                    topic: topic.to_string(),
                    kind,
                    status: TopicStatus::Ok,
                    records,
                    summary: NO_MATERIAL_DEVELOPMENTS.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(topic, %kind, error = %e, "listing unavailable, skipping topic");
                TopicDigest::empty(topic, kind, TopicStatus::ListingUnavailable(e.to_string()))
            }
        }
    }

    async fn collect_records(
        &self,
        term: &str,
        kind: TopicKind,
    ) -> Result<Vec<Record>, IngestError> {
        let limit = match kind {
            TopicKind::Industry => self.config.industry_result_count,
            TopicKind::Company => self.config.company_result_count,
        };

        let candidates = self.listing.fetch_listing(term, limit).await?;
        let listed = candidates.len();
        let cutoff = match kind {
            TopicKind::Industry => self
                .window
                .cutoff_for(candidates.iter().map(CandidateItem::date)),
            TopicKind::Company => None,
        };
        let resolved = self.resolver.resolve_all(candidates).await;

        let normalized: Vec<NormalizedItem> = resolved
            .into_iter()
            .filter_map(|item| self.normalizer.normalize(item))
            .filter(|item| self.relevance.is_relevant(&item.clean_content))
            .collect();
        let usable = normalized.len();

        let records: Vec<Record> = self
            .dedup
            .dedup_items(normalized)
            .into_iter()
            .map(NormalizedItem::into_record)
            .collect();

        let bounded = match (kind, cutoff) {
            (TopicKind::Industry, Some(cutoff)) => WindowFilter::apply_from(cutoff, records),
            (TopicKind::Industry, None) => records,
            (TopicKind::Company, _) => {
                let mut capped = records;
                capped.truncate(self.config.company_record_cap);
                capped
            }
        };

        tracing::debug!(
            term,
            listed,
            usable,
            kept = bounded.len(),
            "sub-run stages complete"
        );
        Ok(bounded)
    }

    /// Fill `digest.summary`. Records emptied by the run-level pass demote
    /// the topic to [`TopicStatus::NoItems`].
    async fn summarize(&self, digest: &mut TopicDigest) {
        if digest.records.is_empty() {
            if digest.status == TopicStatus::Ok {
                digest.status = TopicStatus::NoItems;
            }
            digest.summary = NO_MATERIAL_DEVELOPMENTS.to_string();
            return;
        }

        let text = digest
            .records
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let summary = match self.summarizer.summarize(&digest.topic, &text).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => self.lead.lead(&text),
            Err(e) => {
                tracing::warn!(
                    topic = %digest.topic,
                    error = %e,
                    "summarizer failed, using lead summary"
                );
                self.lead.lead(&text)
            }
        };

        digest.summary = if summary.is_empty() {
            NO_MATERIAL_DEVELOPMENTS.to_string()
        } else {
            summary
        };
    }
}
