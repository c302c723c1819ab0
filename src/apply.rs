//! Correction Applier
//!
//! Splices accepted replacements into the original text without invalidating
//! offsets. Spans are accepted in descending start order, so an edit can
//! never shift a span that has yet to be applied; the output is then built
//! in a single pass over the original buffer, which makes double-applying an
//! edit impossible.
//!
//! The replacement is always the **first** candidate. That is pinned policy
//! inherited from the surrounding pipeline, not a per-candidate ranking.

use crate::models::{AppliedCorrection, Issue};

/// Result of splicing safe corrections into one text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// The new text with all accepted edits applied.
    pub corrected_text: String,
    /// Edits in application order (descending start offset).
    pub applied: Vec<AppliedCorrection>,
    /// Indices into the input slice of the issues that were applied.
    pub applied_indices: Vec<usize>,
}

/// Apply the safe issues to `text`, producing a new string.
///
/// An issue is skipped when it has no replacement candidate, its span falls
/// outside the editable region, or the replacement equals the original
/// segment. Spans are character offsets.
pub fn apply_corrections(text: &str, safe_issues: &[Issue]) -> ApplyOutcome {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut ordered: Vec<usize> = (0..safe_issues.len()).collect();
    ordered.sort_by(|&a, &b| safe_issues[b].start.cmp(&safe_issues[a].start));

    struct Edit<'a> {
        start: usize,
        end: usize,
        replacement: &'a str,
    }

    let mut accepted: Vec<Edit<'_>> = Vec::new();
    let mut applied = Vec::new();
    let mut applied_indices = Vec::new();
    // Everything at or above this offset has already been spliced; spans
    // must end at or before it to stay valid.
    let mut editable_limit = total;

    for index in ordered {
        let issue = &safe_issues[index];
        let replacement = match issue.primary_replacement() {
            Some(replacement) => replacement,
            None => continue,
        };
        if issue.start > issue.end || issue.end > editable_limit {
            continue;
        }

        let original_segment: String = chars[issue.start..issue.end].iter().collect();
        if original_segment == replacement {
            continue;
        }

        accepted.push(Edit {
            start: issue.start,
            end: issue.end,
            replacement,
        });
        applied.push(AppliedCorrection {
            original_segment,
            replacement: replacement.to_string(),
            rule_id: issue.rule_id.clone(),
            message: issue.message.clone(),
            confidence: issue.confidence,
        });
        applied_indices.push(index);
        editable_limit = issue.start;
    }

    // Single ascending pass over the original buffer; `accepted` is in
    // descending start order, so walk it backwards.
    let mut corrected = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for edit in accepted.iter().rev() {
        corrected.extend(chars[cursor..edit.start].iter());
        corrected.push_str(edit.replacement);
        cursor = edit.end;
    }
    corrected.extend(chars[cursor..].iter());

    ApplyOutcome {
        corrected_text: corrected,
        applied,
        applied_indices,
    }
}
