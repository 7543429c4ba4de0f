//! Text cleaning for resolved content and summaries.

use newsdigest_core::{AppConfig, NormalizedItem, ResolvedItem};

const ELLIPSES: [&str; 2] = ["...", "\u{2026}"];

/// Pure text normalizer.
///
/// Rules, in order: collapse whitespace, strip disallowed characters, drop a
/// trailing partial word when the text was hard-truncated, trim, terminate
/// the sentence.
#[derive(Debug, Clone)]
pub struct Normalizer {
    strip_chars: Vec<char>,
    truncation_window: usize,
    min_len: usize,
}

impl Normalizer {
    #[must_use]
    pub fn new(strip_chars: &str, truncation_window: usize, min_len: usize) -> Self {
        Self {
            strip_chars: strip_chars.chars().collect(),
            truncation_window,
            min_len,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.strip_chars,
            config.truncation_window,
            config.min_content_len,
        )
    }

    #[must_use]
    pub fn truncation_window(&self) -> usize {
        self.truncation_window
    }

    /// Clean `text`. Output never contains double spaces and never ends
    /// mid-word; non-empty output always ends in `.`, `!` or `?`.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

        let stripped: String = if self.strip_chars.is_empty() {
            collapsed
        } else {
            collapsed
                .chars()
                .filter(|c| !self.strip_chars.contains(c))
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        };

        let untruncated = self.drop_truncation_artifact(&stripped);
        terminate_sentence(untruncated.trim())
    }

    /// Clean a resolved item. Returns `None` when the cleaned content is
    /// shorter than the minimum length; such items carry no usable signal.
    #[must_use]
    pub fn normalize(&self, item: ResolvedItem) -> Option<NormalizedItem> {
        let clean_content = self.clean(&item.raw_content);
        if clean_content.chars().count() < self.min_len.max(1) {
            tracing::debug!(
                url = %item.candidate.link,
                len = clean_content.chars().count(),
                fetch_error = ?item.fetch_error,
                "dropping content-empty item"
            );
            return None;
        }
        Some(NormalizedItem {
            candidate: item.candidate,
            clean_content,
        })
    }

    /// Cut at the truncation window, and drop the trailing partial token if
    /// the text was cut there or ends with an ellipsis artifact.
    fn drop_truncation_artifact(&self, text: &str) -> String {
        let char_count = text.chars().count();
        let (mut kept, mut truncated) = if char_count > self.truncation_window {
            let cut: String = text.chars().take(self.truncation_window).collect();
            // Cutting exactly before a space leaves a whole final word.
            let next_is_space = text
                .chars()
                .nth(self.truncation_window)
                .is_some_and(char::is_whitespace);
            (cut, !next_is_space)
        } else {
            (text.to_string(), char_count == self.truncation_window)
        };

        if let Some(stripped) = ELLIPSES
            .iter()
            .find_map(|ellipsis| kept.trim_end().strip_suffix(ellipsis))
        {
            kept = stripped.to_string();
            truncated = true;
        }

        if !truncated || ends_on_whole_word(&kept) {
            return kept;
        }

        // A single unbroken token cut mid-way carries nothing usable.
        let trimmed = kept.trim_end();
        trimmed
            .rfind(' ')
            .map_or_else(String::new, |pos| trimmed[..pos].to_string())
    }
}

/// `true` when the last word is known to be complete.
fn ends_on_whole_word(text: &str) -> bool {
    text.ends_with(char::is_whitespace) || text.ends_with(['.', '!', '?'])
}

/// Ensure non-empty text ends with exactly one sentence terminator.
fn terminate_sentence(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let body = text.trim_end_matches(['.', ',', ';', ':', '-']).trim_end();
    if body.is_empty() {
        return String::new();
    }
    if body.ends_with(['!', '?']) {
        return body.to_string();
    }
    format!("{body}.")
}

/// Editorial polish for summaries: capitalise the first letter and end with
/// exactly one full stop.
#[must_use]
pub fn polish_summary(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let body = collapsed.trim_end_matches(['.', '!', '?', ' ']);
    if body.is_empty() {
        return String::new();
    }
    let mut chars = body.chars();
    let capitalised = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{capitalised}.")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
