//! Property-based tests for the issue classifier
//!
//! Tests invariants:
//! - Every classified issue satisfies `0 <= start <= end <= len(text)` no
//!   matter how stale the remote offsets are
//! - Confidence always lands in 0-100
//! - Replacement lists stay deduplicated and capped
//! - Suggestion output respects its hard cap

use proptest::prelude::*;

use crate::classify::classify;
use crate::remote::{RawMatch, RawReplacement};
use crate::suggest::{suggestions_for, MAX_SUGGESTIONS};

fn arb_raw_matches() -> impl Strategy<Value = Vec<RawMatch>> {
    proptest::collection::vec(
        (
            0usize..20_000,
            0usize..20_000,
            "[a-zA-Z ]{1,30}",
            proptest::collection::vec("[a-zA-Z']{0,12}", 0..10),
        ),
        0..6,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .map(|(offset, length, message, replacements)| RawMatch {
                offset: Some(offset),
                length: Some(length),
                message: Some(message),
                rule: None,
                replacements: replacements
                    .into_iter()
                    .map(|value| RawReplacement { value: Some(value) })
                    .collect(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_offset_invariant_holds(
        text in ".{0,100}",
        matches in arb_raw_matches(),
    ) {
        let issues = classify(&matches, &text, "en-US");
        let total = text.chars().count();

        for issue in &issues {
            prop_assert!(issue.span_within(total));
            prop_assert!(issue.confidence <= 100);
        }
    }

    #[test]
    fn prop_replacements_deduped_and_capped(
        text in "[a-z ]{1,60}",
        matches in arb_raw_matches(),
    ) {
        for issue in classify(&matches, &text, "en-US") {
            prop_assert!(issue.replacements.len() <= 5);
            let mut unique = issue.replacements.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), issue.replacements.len());
        }
    }

    #[test]
    fn prop_classified_output_sorted_by_confidence(
        text in "[a-z ]{1,60}",
        matches in arb_raw_matches(),
    ) {
        let issues = classify(&matches, &text, "en-US");
        for window in issues.windows(2) {
            prop_assert!(window[0].confidence >= window[1].confidence);
        }
    }

    #[test]
    fn prop_suggestions_capped(text in ".{0,400}") {
        let suggestions = suggestions_for(&text, &[], MAX_SUGGESTIONS);
        prop_assert!(suggestions.len() <= MAX_SUGGESTIONS);
    }
}
