//! Property-based tests for the correction applier
//!
//! Tests invariants:
//! - Arbitrary (including out-of-range and overlapping) spans never panic
//! - With no applied edits the text is returned byte-for-byte
//! - Non-overlapping in-range edits are all applied
//! - The spliced result equals an independently computed splice

use proptest::prelude::*;

use crate::apply::apply_corrections;
use crate::models::{Issue, IssueCategory};

fn issue(start: usize, end: usize, replacement: &str) -> Issue {
    Issue {
        start,
        end,
        message: "generated".to_string(),
        category: IssueCategory::Typos,
        rule_id: "MORFOLOGIK_RULE_EN_US".to_string(),
        rule_description: String::new(),
        replacements: vec![replacement.to_string()],
        context: String::new(),
        confidence: 90,
    }
}

/// Arbitrary spans, deliberately allowed to overlap and run out of range.
fn arb_wild_spans() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
    proptest::collection::vec((0usize..200, 0usize..200, "[a-zA-Z' ]{0,10}"), 0..8)
}

proptest! {
    #[test]
    fn prop_arbitrary_spans_never_panic(
        text in ".{0,120}",
        spans in arb_wild_spans(),
    ) {
        let issues: Vec<Issue> = spans
            .into_iter()
            .map(|(start, end, replacement)| issue(start, end, &replacement))
            .collect();

        let outcome = apply_corrections(&text, &issues);

        prop_assert!(outcome.applied.len() <= issues.len());
        prop_assert_eq!(outcome.applied.len(), outcome.applied_indices.len());
        if outcome.applied.is_empty() {
            prop_assert_eq!(outcome.corrected_text, text);
        }
    }

    #[test]
    fn prop_non_overlapping_edits_all_apply(
        text in "[a-z]{20,60}",
        layout in proptest::collection::vec((0usize..10, 1usize..5), 1..5),
    ) {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        // Carve non-overlapping spans left to right from the generated layout
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut cursor = 0usize;
        for (gap, width) in layout {
            let start = cursor + gap;
            let end = start + width;
            if end > total {
                break;
            }
            spans.push((start, end));
            cursor = end;
        }

        // "X" never equals a lowercase segment, so every span must apply
        let issues: Vec<Issue> = spans.iter().map(|&(s, e)| issue(s, e, "X")).collect();
        let outcome = apply_corrections(&text, &issues);
        prop_assert_eq!(outcome.applied.len(), spans.len());

        // Independent ascending splice for comparison
        let mut expected = String::new();
        let mut cur = 0usize;
        for &(start, end) in &spans {
            expected.extend(chars[cur..start].iter());
            expected.push('X');
            cur = end;
        }
        expected.extend(chars[cur..].iter());

        prop_assert_eq!(outcome.corrected_text, expected);
    }

    #[test]
    fn prop_identical_replacement_is_never_applied(
        text in "[a-z]{5,40}",
        start in 0usize..20,
        width in 1usize..5,
    ) {
        let chars: Vec<char> = text.chars().collect();
        let end = (start + width).min(chars.len());
        prop_assume!(start < end);

        let segment: String = chars[start..end].iter().collect();
        let outcome = apply_corrections(&text, &[issue(start, end, &segment)]);

        prop_assert!(outcome.applied.is_empty());
        prop_assert_eq!(outcome.corrected_text, text);
    }
}
