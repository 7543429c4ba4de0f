use chrono::DateTime;
use newsdigest_core::{CandidateItem, FetchErrorKind, ResolvedItem};

use super::*;

fn default_normalizer() -> Normalizer {
    Normalizer::new("?", 1024, 20)
}

fn candidate() -> CandidateItem {
    CandidateItem {
        title: "BASF plans new EO plant".to_string(),
        published_raw: "2024-03-10T08:00:00Z".to_string(),
        published_at: DateTime::parse_from_rfc3339("2024-03-10T08:00:00Z").unwrap(),
        link: "https://example.com/basf-eo".to_string(),
        locked: false,
    }
}

#[test]
fn collapses_whitespace_runs() {
    let out = default_normalizer().clean("  BASF   plans\n\ta new\r\n plant  ");
    assert_eq!(out, "BASF plans a new plant.");
}

#[test]
fn strips_question_marks_and_recollapses() {
    let n = default_normalizer();
    assert_eq!(
        n.clean("Is demand recovering? Analysts say yes"),
        "Is demand recovering Analysts say yes."
    );
    assert_eq!(n.clean("What next ? Plans"), "What next Plans.");
}

#[test]
fn empty_strip_set_keeps_question_marks() {
    let n = Normalizer::new("", 1024, 1);
    assert_eq!(n.clean("Is demand recovering?"), "Is demand recovering?");
}

#[test]
fn hard_cut_drops_partial_word() {
    let n = Normalizer::new("", 20, 1);
    // First 20 chars end inside "specialty".
    assert_eq!(
        n.clean("Evonik expands specialty silica output in Asia"),
        "Evonik expands."
    );
}

#[test]
fn cut_just_before_a_space_keeps_last_word() {
    let n = Normalizer::new("", 14, 1);
    assert_eq!(
        n.clean("Evonik expands specialty silica output"),
        "Evonik expands."
    );
}

#[test]
fn text_at_exactly_the_window_is_treated_as_cut() {
    let n = Normalizer::new("", 10, 1);
    assert_eq!(n.clean("abcde fghi"), "abcde.");
    // A sentence terminator proves the last word is whole.
    assert_eq!(n.clean("abcde fgh."), "abcde fgh.");
}

#[test]
fn trailing_ellipsis_drops_partial_word() {
    let n = default_normalizer();
    assert_eq!(
        n.clean("Dow reports Q3 earnings decl..."),
        "Dow reports Q3 earnings."
    );
    assert_eq!(
        n.clean("Clariant sees weaker dem\u{2026}"),
        "Clariant sees weaker."
    );
}

#[test]
fn ellipsis_after_a_space_keeps_last_word() {
    assert_eq!(default_normalizer().clean("Margins improve ..."), "Margins improve.");
}

#[test]
fn single_cut_token_yields_empty() {
    let n = Normalizer::new("", 5, 1);
    assert_eq!(n.clean("Supercalifragilistic"), "");
}

#[test]
fn terminates_sentences() {
    let n = default_normalizer();
    assert_eq!(n.clean("Solvay spins off unit"), "Solvay spins off unit.");
    assert_eq!(n.clean("Solvay spins off unit;"), "Solvay spins off unit.");
    assert_eq!(n.clean("Solvay spins off unit -"), "Solvay spins off unit.");
    assert_eq!(n.clean("Done.."), "Done.");
}

#[test]
fn keeps_exclamation_terminator() {
    assert_eq!(default_normalizer().clean("Profit soars!"), "Profit soars!");
}

#[test]
fn empty_and_blank_input_stay_empty() {
    let n = default_normalizer();
    assert_eq!(n.clean(""), "");
    assert_eq!(n.clean("   \n\t "), "");
    assert_eq!(n.clean("???"), "");
}

#[test]
fn output_never_has_double_spaces_or_ends_mid_word() {
    let input = "Clariant and Evonik announce a joint venture for specialty surfactants in Dahej";
    let words: Vec<&str> = input.split(' ').collect();

    for window in 1..=input.len() + 5 {
        let out = Normalizer::new("", window, 1).clean(input);
        assert!(!out.contains("  "), "double space at window {window}: {out:?}");
        if out.is_empty() {
            continue;
        }
        assert!(out.ends_with('.'), "unterminated at window {window}: {out:?}");
        let last = out
            .trim_end_matches('.')
            .rsplit(' ')
            .next()
            .unwrap_or_default();
        assert!(
            words.contains(&last),
            "partial word {last:?} at window {window}: {out:?}"
        );
    }
}

#[test]
fn normalize_drops_short_content() {
    let item = ResolvedItem::ok(candidate(), "Too short".to_string());
    assert!(default_normalizer().normalize(item).is_none());
}

#[test]
fn normalize_drops_failed_items() {
    let item = ResolvedItem::failed(candidate(), FetchErrorKind::Timeout);
    assert!(default_normalizer().normalize(item).is_none());
}

#[test]
fn normalize_keeps_candidate_and_cleans_content() {
    let item = ResolvedItem::ok(
        candidate(),
        "BASF  plans a new ethylene oxide plant in Antwerp?".to_string(),
    );
    let normalized = default_normalizer()
        .normalize(item)
        .expect("content is long enough");
    assert_eq!(
        normalized.clean_content,
        "BASF plans a new ethylene oxide plant in Antwerp."
    );
    assert_eq!(normalized.candidate, candidate());
}

#[test]
fn zero_min_length_still_drops_empty_content() {
    let n = Normalizer::new("?", 1024, 0);
    let item = ResolvedItem::ok(candidate(), "   ".to_string());
    assert!(n.normalize(item).is_none());
}

#[test]
fn polish_capitalises_and_ends_with_one_full_stop() {
    assert_eq!(polish_summary("basf expands capacity"), "Basf expands capacity.");
    assert_eq!(polish_summary("already done..."), "Already done.");
    assert_eq!(
        polish_summary("  multiple   spaces here!  "),
        "Multiple spaces here."
    );
    assert_eq!(polish_summary(""), "");
    assert_eq!(polish_summary(" . "), "");
}
