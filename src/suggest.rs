//! Suggestion Generator
//!
//! Stateless writing suggestions that work even when the analysis service is
//! unreachable: proactive heuristics over the raw text, combined with
//! targeted summaries of whatever issues a check did surface. Output is
//! capped — the pipeline surfaces these as hints, not as a report.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Issue, Suggestion};

/// Hard cap on suggestions returned per call.
pub const MAX_SUGGESTIONS: usize = 10;

/// A sentence longer than this with no comma reads poorly.
const LONG_SENTENCE_CHARS: usize = 50;

/// Characters of the sentence quoted back in a suggestion message.
const SNIPPET_CHARS: usize = 30;

static PASSIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:is|was|were|are|been|being)\s+\w+(?:ed|en)\b")
        .expect("passive-voice pattern is valid")
});

/// Proactive heuristics over raw text, independent of the remote service.
pub fn heuristic_suggestions(text: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for sentence in split_sentences(text) {
        let length = sentence.chars().count();
        if length > LONG_SENTENCE_CHARS && !sentence.contains(',') {
            suggestions.push(Suggestion::new(
                "readability",
                format!(
                    "Sentence starting \"{}\" is long and unpunctuated; consider splitting it",
                    snippet(sentence)
                ),
            ));
        }
        if PASSIVE_PATTERN.is_match(sentence) {
            suggestions.push(Suggestion::new(
                "passive-voice",
                format!(
                    "Sentence starting \"{}\" may use passive voice",
                    snippet(sentence)
                ),
            ));
        }
    }

    suggestions
}

/// Combine targeted suggestions (issues grouped by category) with the
/// proactive heuristics, capped at `limit`.
pub fn suggestions_for(text: &str, issues: &[Issue], limit: usize) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    // BTreeMap keeps category order deterministic across calls
    let mut grouped: BTreeMap<String, (usize, &str)> = BTreeMap::new();
    for issue in issues {
        let entry = grouped
            .entry(issue.category.to_string())
            .or_insert((0, issue.message.as_str()));
        entry.0 += 1;
    }

    for (category, (count, sample)) in grouped {
        let plural = if count == 1 { "" } else { "s" };
        suggestions.push(Suggestion::new(
            category.clone(),
            format!("{count} possible {category} issue{plural}, e.g.: {sample}"),
        ));
    }

    suggestions.extend(heuristic_suggestions(text));
    suggestions.truncate(limit);
    suggestions
}

fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn snippet(sentence: &str) -> String {
    let mut out: String = sentence.chars().take(SNIPPET_CHARS).collect();
    if sentence.chars().count() > SNIPPET_CHARS {
        out.push_str("...");
    }
    out
}
