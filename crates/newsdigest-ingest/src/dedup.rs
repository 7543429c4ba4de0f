//! Near-duplicate suppression over cleaned text.

use std::borrow::Cow;
use std::collections::HashSet;

use newsdigest_core::{AppConfig, NormalizedItem, Record, SimilarityMetric};

/// Greedy order-preserving deduplicator.
///
/// An item is dropped when its similarity to any already-retained item is
/// at or above `threshold`. Similarity lies in `[0, 1]` and is
/// case-sensitive unless built with [`Deduplicator::ignoring_case`].
#[derive(Debug, Clone, Copy)]
pub struct Deduplicator {
    threshold: f64,
    metric: SimilarityMetric,
    ignore_case: bool,
}

impl Deduplicator {
    #[must_use]
    pub fn new(threshold: f64, metric: SimilarityMetric) -> Self {
        Self {
            threshold,
            metric,
            ignore_case: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.dedup_threshold, config.similarity_metric)
            .ignoring_case(config.dedup_ignore_case)
    }

    /// Fold case before both the exact and the near-duplicate checks.
    #[must_use]
    pub fn ignoring_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = self.fold(a);
        let b = self.fold(b);
        match self.metric {
            SimilarityMetric::Ratio => {
                f64::from(similar::TextDiff::from_chars(&*a, &*b).ratio())
            }
            SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(&a, &b),
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(&a, &b),
            SimilarityMetric::SorensenDice => strsim::sorensen_dice(&a, &b),
        }
    }

    fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.ignore_case {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Inclusive: a pair exactly at the threshold counts as a duplicate.
    #[must_use]
    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        self.similarity(a, b) >= self.threshold
    }

    /// Indices of the texts to keep, ascending.
    ///
    /// Exact duplicates go first, then a single greedy pass compares each
    /// survivor against everything retained before it.
    /// Applying the result again retains every index.
    #[must_use]
    pub fn retain_indices(&self, texts: &[&str]) -> Vec<usize> {
        let mut seen = HashSet::with_capacity(texts.len());
        let distinct: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|&(_, &text)| seen.insert(self.fold(text)))
            .map(|(idx, _)| idx)
            .collect();

        let mut kept: Vec<usize> = Vec::with_capacity(distinct.len());
        for idx in distinct {
            let candidate = texts[idx];
            if kept
                .iter()
                .all(|&prior| !self.is_duplicate(texts[prior], candidate))
            {
                kept.push(idx);
            }
        }
        kept
    }

    /// Dedup normalized items on their cleaned content.
    #[must_use]
    pub fn dedup_items(&self, items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
        let texts: Vec<&str> = items.iter().map(|i| i.clean_content.as_str()).collect();
        let keep: HashSet<usize> = self.retain_indices(&texts).into_iter().collect();
        let before = items.len();

        let kept: Vec<NormalizedItem> = items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| keep.contains(&idx).then_some(item))
            .collect();

        if kept.len() < before {
            tracing::debug!(
                before,
                after = kept.len(),
                threshold = self.threshold,
                metric = %self.metric,
                "suppressed near-duplicate items"
            );
        }
        kept
    }

    /// Enforce run-wide record uniqueness across topic groups.
    ///
    /// Groups are visited in order; a record is dropped when its link was
    /// already retained anywhere earlier in the run, or when its content is
    /// a duplicate of earlier retained content. Returns the number dropped.
    pub fn dedup_across(&self, groups: &mut [&mut Vec<Record>]) -> usize {
        let mut links: HashSet<String> = HashSet::new();
        let mut contents: Vec<String> = Vec::new();
        let mut dropped = 0;

        for group in groups.iter_mut() {
            group.retain(|record| {
                let collides = links.contains(&record.link)
                    || contents
                        .iter()
                        .any(|prior| self.is_duplicate(prior, &record.content));
                if collides {
                    tracing::debug!(
                        url = %record.link,
                        "dropping record already covered earlier in run"
                    );
                    dropped += 1;
                    return false;
                }
                links.insert(record.link.clone());
                contents.push(record.content.clone());
                true
            });
        }
        dropped
    }
}
