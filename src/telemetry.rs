//! Telemetry Sink
//!
//! Best-effort rule-hit reporting, modeled as an injected collaborator with
//! one narrow operation so tests can substitute a recording or failing
//! implementation. Sink failures never influence a correction outcome.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule type reported for hits produced by this gateway.
pub const RULE_TYPE_REMOTE_ANALYSIS: &str = "RemoteAnalysis";

/// Upper bound the hit store enforces on rule keys.
pub const MAX_RULE_KEY_CHARS: usize = 400;

/// Aggregated hit count for one rule within one check call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    pub source_code: String,
    pub mode: String,
    pub rule_type: String,
    pub rule_key: String,
    pub hit_count: u64,
}

impl RuleHit {
    /// Build a remote-analysis hit, truncating the rule key to the store's
    /// column width.
    pub fn remote_analysis(source_code: &str, mode: &str, rule_key: &str, hit_count: u64) -> Self {
        let rule_key = if rule_key.chars().count() > MAX_RULE_KEY_CHARS {
            rule_key.chars().take(MAX_RULE_KEY_CHARS).collect()
        } else {
            rule_key.to_string()
        };

        Self {
            source_code: source_code.to_string(),
            mode: mode.to_string(),
            rule_type: RULE_TYPE_REMOTE_ANALYSIS.to_string(),
            rule_key,
            hit_count,
        }
    }
}

/// Errors a telemetry backend may surface. The gateway logs and swallows
/// them without exception.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry store error: {0}")]
    Store(String),
}

/// Narrow interface to the rule-hit persistence store.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn upsert_hits(&self, hits: Vec<RuleHit>) -> Result<(), TelemetryError>;
}

/// Discards all hits. The default sink.
#[derive(Debug, Default)]
pub struct NoopTelemetry;

#[async_trait]
impl TelemetrySink for NoopTelemetry {
    async fn upsert_hits(&self, _hits: Vec<RuleHit>) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Records every reported hit in memory.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    hits: Mutex<Vec<RuleHit>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn recorded(&self) -> Vec<RuleHit> {
        self.hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TelemetrySink for RecordingTelemetry {
    async fn upsert_hits(&self, hits: Vec<RuleHit>) -> Result<(), TelemetryError> {
        self.hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(hits);
        Ok(())
    }
}
