//! Core Data Types
//!
//! Issues, check results, and correction results exchanged between the
//! gateway and the enhancement pipeline. All offsets are character offsets
//! into the normalized input text.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Issue Categories
// ============================================================================

/// Category of a reported issue, derived from the remote service's
/// category id/name. Unrecognized categories map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    Typos,
    Grammar,
    Style,
    Casing,
    Typography,
    Redundancy,
    Punctuation,
    Other,
}

impl IssueCategory {
    /// Map a remote category id or display name to a category.
    ///
    /// Matching is case-insensitive; the id takes precedence over the name.
    pub fn from_remote(id: Option<&str>, name: Option<&str>) -> Self {
        let raw = id.or(name).unwrap_or_default().to_ascii_uppercase();
        match raw.as_str() {
            "TYPOS" | "TYPO" | "POSSIBLE TYPO" => Self::Typos,
            "GRAMMAR" => Self::Grammar,
            "STYLE" => Self::Style,
            "CASING" | "CAPITALIZATION" => Self::Casing,
            "TYPOGRAPHY" => Self::Typography,
            "REDUNDANCY" => Self::Redundancy,
            "PUNCTUATION" => Self::Punctuation,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Typos => "spelling",
            Self::Grammar => "grammar",
            Self::Style => "style",
            Self::Casing => "capitalization",
            Self::Typography => "typography",
            Self::Redundancy => "redundancy",
            Self::Punctuation => "punctuation",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Issues
// ============================================================================

/// A single normalized issue reported for a span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Start of the affected span (character offset, inclusive)
    pub start: usize,
    /// End of the affected span (character offset, exclusive)
    pub end: usize,
    /// Human-readable description of the issue
    pub message: String,
    /// Issue category
    pub category: IssueCategory,
    /// Remote rule identifier (e.g. `MORFOLOGIK_RULE_EN_US`)
    pub rule_id: String,
    /// Remote rule description
    pub rule_description: String,
    /// Replacement candidates, deduplicated, first-seen order, capped at 5
    pub replacements: Vec<String>,
    /// Snippet of the surrounding text
    pub context: String,
    /// Heuristic confidence score, 0-100
    pub confidence: u8,
}

impl Issue {
    /// Whether the span satisfies `0 <= start <= end <= text_chars`.
    pub fn span_within(&self, text_chars: usize) -> bool {
        self.start <= self.end && self.end <= text_chars
    }

    /// First replacement candidate, if any. Applying corrections always
    /// takes the first candidate; this is the pinned policy, not a ranking.
    pub fn primary_replacement(&self) -> Option<&str> {
        self.replacements.first().map(String::as_str)
    }
}

// ============================================================================
// Check Results
// ============================================================================

/// Outcome classification for a check call, so fail-open paths are
/// observable instead of indistinguishable from "no issues found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// The remote service was consulted (or a cached result served)
    Ok,
    /// The remote service failed; the result degrades to zero issues
    RemoteUnavailable,
    /// The input was empty/whitespace-only; no remote call was made
    Invalid,
}

/// Immutable result of checking one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// How this result was produced
    pub status: CheckStatus,
    /// Whether any issues were found
    pub has_issues: bool,
    /// Number of issues
    pub count: usize,
    /// Issues, ordered by descending confidence
    pub issues: Vec<Issue>,
    /// Wall-clock time spent producing this result
    pub elapsed_ms: u64,
}

impl CheckResult {
    /// An empty result with the given status (invalid input, remote failure).
    pub fn empty(status: CheckStatus) -> Self {
        Self {
            status,
            has_issues: false,
            count: 0,
            issues: Vec::new(),
            elapsed_ms: 0,
        }
    }

    /// A successful result from classified issues.
    pub fn from_issues(issues: Vec<Issue>, elapsed_ms: u64) -> Self {
        Self {
            status: CheckStatus::Ok,
            has_issues: !issues.is_empty(),
            count: issues.len(),
            issues,
            elapsed_ms,
        }
    }
}

// ============================================================================
// Correction Results
// ============================================================================

/// One correction that was spliced into the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCorrection {
    /// The segment that was replaced
    pub original_segment: String,
    /// The replacement text
    pub replacement: String,
    /// Rule that produced the correction
    pub rule_id: String,
    /// Issue message
    pub message: String,
    /// Confidence of the underlying issue
    pub confidence: u8,
}

/// Result of an auto-correction pass over one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// The text the corrections were computed against
    pub original_text: String,
    /// The text with safe corrections applied
    pub corrected_text: String,
    /// Corrections that were applied, in application order
    pub applied: Vec<AppliedCorrection>,
    /// Analyzed issues that were not applied
    pub remaining_issues: Vec<Issue>,
}

impl CorrectionResult {
    /// A result that leaves the text unchanged.
    pub fn unchanged(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            original_text: text.clone(),
            corrected_text: text,
            applied: Vec::new(),
            remaining_issues: Vec::new(),
        }
    }

    /// Whether any corrections were applied.
    pub fn has_corrections(&self) -> bool {
        !self.applied.is_empty()
    }
}

// ============================================================================
// Suggestions
// ============================================================================

/// A proactive writing suggestion, independent of any applied correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggestion group (e.g. "spelling", "readability", "passive-voice")
    pub category: String,
    /// Human-readable suggestion
    pub message: String,
}

impl Suggestion {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
        }
    }
}
