//! Test doubles for the gateway's injected collaborators.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::remote::{
    AnalysisClient, RawCategory, RawMatch, RawReplacement, RawRule, RemoteError, RemoteResult,
};
use crate::telemetry::{RuleHit, TelemetryError, TelemetrySink};

// ============================================================================
// Raw Match Builders
// ============================================================================

/// A spelling match the way the analysis service typically reports one:
/// `MORFOLOGIK_RULE_EN_US`, category TYPOS, one replacement.
pub fn spelling_match(offset: usize, length: usize, replacement: &str) -> RawMatch {
    RawMatch {
        offset: Some(offset),
        length: Some(length),
        message: Some("Possible spelling mistake found.".to_string()),
        rule: Some(RawRule {
            id: Some("MORFOLOGIK_RULE_EN_US".to_string()),
            description: Some("Possible spelling mistake".to_string()),
            category: Some(RawCategory {
                id: Some("TYPOS".to_string()),
                name: Some("Possible Typo".to_string()),
            }),
        }),
        replacements: vec![RawReplacement {
            value: Some(replacement.to_string()),
        }],
    }
}

/// A style match with no replacement: classifies at confidence 60 —
/// reportable, but below the safe-correction threshold.
pub fn style_match(offset: usize, length: usize) -> RawMatch {
    RawMatch {
        offset: Some(offset),
        length: Some(length),
        message: Some("This phrasing is wordy.".to_string()),
        rule: Some(RawRule {
            id: Some("WORDINESS".to_string()),
            description: Some("Wordy phrasing".to_string()),
            category: Some(RawCategory {
                id: Some("STYLE".to_string()),
                name: Some("Style".to_string()),
            }),
        }),
        replacements: Vec::new(),
    }
}

/// A high-confidence match in an ignored category (typography); must never
/// survive the rule filter.
pub fn typography_match(offset: usize, length: usize) -> RawMatch {
    RawMatch {
        offset: Some(offset),
        length: Some(length),
        message: Some("Use a typographic apostrophe.".to_string()),
        rule: Some(RawRule {
            id: Some("APOS_TYPOGRAPHIC".to_string()),
            description: Some("Typographic apostrophe".to_string()),
            category: Some(RawCategory {
                id: Some("TYPOGRAPHY".to_string()),
                name: Some("Typography".to_string()),
            }),
        }),
        replacements: vec![RawReplacement {
            value: Some("\u{2019}".to_string()),
        }],
    }
}

// ============================================================================
// Analysis Clients
// ============================================================================

/// Scripted client that returns the same matches on every call and counts
/// invocations; optionally sleeps first to widen race windows.
pub struct MockAnalysisClient {
    matches: Vec<RawMatch>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAnalysisClient {
    pub fn new(matches: Vec<RawMatch>) -> Self {
        Self {
            matches,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(matches: Vec<RawMatch>, delay: Duration) -> Self {
        Self {
            matches,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisClient for MockAnalysisClient {
    async fn analyze(&self, _text: &str, _language: &str) -> RemoteResult<Vec<RawMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.matches.clone())
    }
}

/// Client that always fails, counting attempts — used to pin the fail-open
/// and never-cache-failures behavior.
#[derive(Default)]
pub struct FailingAnalysisClient {
    calls: AtomicUsize,
}

impl FailingAnalysisClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisClient for FailingAnalysisClient {
    async fn analyze(&self, _text: &str, _language: &str) -> RemoteResult<Vec<RawMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RemoteError::Status {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

// ============================================================================
// Telemetry Sinks
// ============================================================================

/// Sink that always errors; correction outcomes must not change.
#[derive(Default)]
pub struct FailingTelemetry;

#[async_trait]
impl TelemetrySink for FailingTelemetry {
    async fn upsert_hits(&self, _hits: Vec<RuleHit>) -> Result<(), TelemetryError> {
        Err(TelemetryError::Store("telemetry store down".to_string()))
    }
}
