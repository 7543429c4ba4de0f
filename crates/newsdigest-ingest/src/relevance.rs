//! Pluggable relevance predicate applied between normalization and dedup.

/// Decides whether a cleaned text belongs in the digest.
pub trait RelevanceFilter: Send + Sync {
    fn is_relevant(&self, text: &str) -> bool;
}

impl<F> RelevanceFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_relevant(&self, text: &str) -> bool {
        self(text)
    }
}

/// Keeps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl RelevanceFilter for AcceptAll {
    fn is_relevant(&self, _text: &str) -> bool {
        true
    }
}

/// Case-insensitive any-match over a keyword list.
///
/// Single-word keywords match whole words (punctuation trimmed); keywords
/// containing a space match as substrings of the lowercased text. An empty
/// list accepts everything.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl RelevanceFilter for KeywordFilter {
    fn is_relevant(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .collect();

        self.keywords.iter().any(|keyword| {
            if keyword.contains(' ') {
                lowered.contains(keyword.as_str())
            } else {
                words.contains(&keyword.as_str())
            }
        })
    }
}
