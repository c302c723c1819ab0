//! Rule Filter
//!
//! Two policy predicates over classified issues: which issues are worth
//! reporting at all, and which are trusted enough to splice into the text
//! automatically. The safe set is a closed allow-list — precision over
//! recall, because an automatic edit that goes wrong corrupts a record
//! silently while a missed correction costs nothing.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::config::RuleConfig;
use crate::models::{Issue, IssueCategory};

/// Categories that produce more noise than signal on dictionary content.
const IGNORED_CATEGORIES: [IssueCategory; 3] = [
    IssueCategory::Casing,
    IssueCategory::Typography,
    IssueCategory::Redundancy,
];

/// Rule ids with a chronic false-positive record on short definition text.
static IGNORED_RULES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "EN_QUOTES",
        "DASH_RULE",
        "WORD_CONTAINS_UNDERSCORE",
        "EN_UNPAIRED_BRACKETS",
        "TOO_LONG_SENTENCE",
    ]
    .into_iter()
    .collect()
});

/// Rules low-risk enough for unattended application.
static SAFE_RULES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "UPPERCASE_SENTENCE_START",
        "EN_A_VS_AN",
        "WHITESPACE_RULE",
        "COMMA_PARENTHESIS_WHITESPACE",
        "DOUBLE_PUNCTUATION",
    ]
    .into_iter()
    .collect()
});

/// The spelling-dictionary rule family (`MORFOLOGIK_RULE_EN_US`, ...) is
/// safe as a whole across languages.
const SAFE_RULE_FAMILY_PREFIX: &str = "MORFOLOGIK_RULE_";

/// Policy over classified issues. Thresholds and list extensions come from
/// [`RuleConfig`]; the built-in tables are fixed.
#[derive(Debug, Clone)]
pub struct RuleFilter {
    config: RuleConfig,
}

impl RuleFilter {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// Whether an issue should be dropped from check results entirely.
    pub fn should_ignore(&self, issue: &Issue) -> bool {
        issue.confidence < self.config.ignore_floor
            || IGNORED_CATEGORIES.contains(&issue.category)
            || IGNORED_RULES.contains(issue.rule_id.as_str())
            || self
                .config
                .extra_ignored_rules
                .iter()
                .any(|r| r == &issue.rule_id)
    }

    /// Whether an issue may be applied to the text without review.
    pub fn is_safe_for_auto_correction(&self, issue: &Issue) -> bool {
        issue.confidence >= self.config.safe_threshold && self.is_allow_listed(&issue.rule_id)
    }

    fn is_allow_listed(&self, rule_id: &str) -> bool {
        rule_id.starts_with(SAFE_RULE_FAMILY_PREFIX)
            || SAFE_RULES.contains(rule_id)
            || self.config.extra_safe_rules.iter().any(|r| r == rule_id)
    }
}

impl Default for RuleFilter {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
