//! Issue Classifier
//!
//! Converts raw matches from the analysis service into normalized [`Issue`]
//! records: clamped character offsets, a context snippet, deduplicated
//! replacement candidates, and a heuristic confidence score.

use crate::models::{Issue, IssueCategory};
use crate::remote::RawMatch;

/// Characters of context captured on each side of an issue span.
const CONTEXT_WINDOW_CHARS: usize = 100;

/// Replacement candidates kept per issue.
const MAX_REPLACEMENTS: usize = 5;

/// Classify raw matches against the text they were reported for.
///
/// Matches missing an offset, length, or message are unusable and skipped.
/// Offsets are clamped into `[0, chars]` — the service may report stale
/// spans when its view of the text lags. Output is ordered by descending
/// confidence.
pub fn classify(raw_matches: &[RawMatch], text: &str, language: &str) -> Vec<Issue> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut issues: Vec<Issue> = Vec::with_capacity(raw_matches.len());
    for raw in raw_matches {
        let (offset, length, message) = match (raw.offset, raw.length, raw.message.as_deref()) {
            (Some(offset), Some(length), Some(message)) if !message.is_empty() => {
                (offset, length, message)
            }
            _ => {
                log::debug!("Skipping analysis match with missing offset/length/message");
                continue;
            }
        };

        let start = offset.min(total);
        let end = offset.saturating_add(length).min(total).max(start);

        let (rule_id, rule_description, category) = match &raw.rule {
            Some(rule) => (
                rule.id.clone().unwrap_or_default(),
                rule.description.clone().unwrap_or_default(),
                rule.category.as_ref().map_or(IssueCategory::Other, |c| {
                    IssueCategory::from_remote(c.id.as_deref(), c.name.as_deref())
                }),
            ),
            None => (String::new(), String::new(), IssueCategory::Other),
        };

        let replacements = dedupe_replacements(raw);
        let confidence =
            confidence_for(category, !replacements.is_empty(), &rule_id, language);

        issues.push(Issue {
            start,
            end,
            message: message.to_string(),
            category,
            rule_id,
            rule_description,
            replacements,
            context: context_snippet(&chars, start, end),
            confidence,
        });
    }

    // Stable sort keeps the remote's ordering within equal confidence
    issues.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    issues
}

/// Case-sensitive exact-match dedupe, first-seen order, capped at
/// `MAX_REPLACEMENTS`. Empty candidates are kept — they encode deletions.
fn dedupe_replacements(raw: &RawMatch) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for candidate in raw.replacements.iter().filter_map(|r| r.value.clone()) {
        if seen.len() == MAX_REPLACEMENTS {
            break;
        }
        if !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }
    seen
}

fn context_snippet(chars: &[char], start: usize, end: usize) -> String {
    let from = start.saturating_sub(CONTEXT_WINDOW_CHARS);
    let to = end.saturating_add(CONTEXT_WINDOW_CHARS).min(chars.len());
    chars[from..to].iter().collect()
}

/// Confidence scoring: category base (Typos 95, Grammar 80, Style 60,
/// anything else 70), +10 when a replacement exists, +5 when the rule id is
/// language-specific, clamped to 0-100.
fn confidence_for(
    category: IssueCategory,
    has_replacement: bool,
    rule_id: &str,
    language: &str,
) -> u8 {
    let mut score: i32 = match category {
        IssueCategory::Typos => 95,
        IssueCategory::Grammar => 80,
        IssueCategory::Style => 60,
        _ => 70,
    };

    if has_replacement {
        score += 10;
    }
    if rule_has_language_prefix(rule_id, language) {
        score += 5;
    }

    score.clamp(0, 100) as u8
}

/// Whether a rule id is targeted at the request language — a signal the
/// rule is well-tuned rather than generic. Matches the full tag (`EN_US`)
/// or its primary subtag (`EN_`), at the front or after an underscore, so
/// both `EN_A_VS_AN` and `MORFOLOGIK_RULE_EN_US` qualify for "en-US".
pub(crate) fn rule_has_language_prefix(rule_id: &str, language: &str) -> bool {
    if rule_id.is_empty() {
        return false;
    }
    let tag = language.trim().replace('-', "_").to_ascii_uppercase();
    if tag.is_empty() {
        return false;
    }
    let primary = tag.split('_').next().unwrap_or(&tag).to_string();

    for marker in [tag, primary] {
        let prefixed = format!("{marker}_");
        if rule_id.starts_with(&prefixed)
            || rule_id.contains(&format!("_{prefixed}"))
            || rule_id.ends_with(&format!("_{marker}"))
        {
            return true;
        }
    }
    false
}
