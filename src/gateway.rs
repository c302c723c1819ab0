//! Grammar Correction Gateway
//!
//! Orchestrates the full check flow: normalize → cache key → cache lookup →
//! per-key stampede guard → cache re-check → rate-limited remote call →
//! classification → rule filtering → cache store → best-effort telemetry.
//!
//! Every public operation is fail-open: invalid input and remote failures
//! degrade to empty results and never cross the boundary as errors. Only
//! cancellation (dropping the future) escapes, and a cancelled call writes
//! no partial state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::apply::apply_corrections;
use crate::cache::{result_cache_key, CacheStats, ResultCache};
use crate::classify::classify;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{CheckResult, CheckStatus, CorrectionResult, Issue, Suggestion};
use crate::normalize::{normalize, NormalizedInput};
use crate::rate_limit::RemoteRateLimiter;
use crate::remote::{AnalysisClient, HttpAnalysisClient};
use crate::rules::RuleFilter;
use crate::stampede::KeyedLocks;
use crate::suggest::{suggestions_for, MAX_SUGGESTIONS};
use crate::telemetry::{NoopTelemetry, RuleHit, TelemetrySink};

/// Outer auto-correction deadline, as a multiple of the per-call remote
/// timeout. Bounds worst-case latency when the service is slow but alive.
const AUTO_CORRECT_TIMEOUT_FACTOR: u32 = 3;

/// Entry point consumed by the content-enhancement pipeline.
pub struct GrammarGateway {
    config: GatewayConfig,
    cache: ResultCache,
    locks: KeyedLocks,
    limiter: RemoteRateLimiter,
    client: Arc<dyn AnalysisClient>,
    telemetry: Arc<dyn TelemetrySink>,
    filter: RuleFilter,
}

impl GrammarGateway {
    /// Build a gateway with the HTTP analysis client and no telemetry.
    ///
    /// Must run inside a Tokio runtime — the rate limiter spawns its refill
    /// task here.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Arc::new(HttpAnalysisClient::new(&config.remote)?);
        Self::with_components(config, client, Arc::new(NoopTelemetry))
    }

    /// Build a gateway with injected collaborators.
    pub fn with_components(
        config: GatewayConfig,
        client: Arc<dyn AnalysisClient>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> GatewayResult<Self> {
        if !(0.0..=1.0).contains(&config.cache.evict_fraction) {
            return Err(GatewayError::Config(format!(
                "cache.evict_fraction must be within [0, 1], got {}",
                config.cache.evict_fraction
            )));
        }

        Ok(Self {
            cache: ResultCache::new(config.cache.clone()),
            locks: KeyedLocks::new(),
            limiter: RemoteRateLimiter::from_config(&config.rate_limit),
            filter: RuleFilter::new(config.rules.clone()),
            client,
            telemetry,
            config,
        })
    }

    /// Check `text` for issues. Never errors: invalid input and remote
    /// failures produce empty results with the matching [`CheckStatus`].
    pub async fn check(&self, text: &str, language: &str) -> CheckResult {
        match normalize(text, language, &self.config.input) {
            Some(input) => self.check_normalized(&input).await,
            None => CheckResult::empty(CheckStatus::Invalid),
        }
    }

    /// Check and apply the safe subset of corrections. Returns the text
    /// unchanged when nothing safe applies, the input is invalid, the remote
    /// fails, or the outer deadline expires.
    pub async fn auto_correct(&self, text: &str, language: &str) -> CorrectionResult {
        let input = match normalize(text, language, &self.config.input) {
            Some(input) => input,
            None => return CorrectionResult::unchanged(text),
        };

        let deadline = self.config.remote.timeout() * AUTO_CORRECT_TIMEOUT_FACTOR;
        let result = match tokio::time::timeout(deadline, self.check_normalized(&input)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "Auto-correction deadline ({}s) expired; leaving text unchanged",
                    deadline.as_secs()
                );
                return CorrectionResult::unchanged(input.text);
            }
        };

        if !result.has_issues {
            return CorrectionResult::unchanged(input.text);
        }

        let safe: Vec<Issue> = result
            .issues
            .iter()
            .filter(|issue| self.filter.is_safe_for_auto_correction(issue))
            .cloned()
            .collect();

        let outcome = apply_corrections(&input.text, &safe);
        let applied_issues: Vec<&Issue> =
            outcome.applied_indices.iter().map(|&i| &safe[i]).collect();
        let remaining_issues: Vec<Issue> = result
            .issues
            .iter()
            .filter(|issue| !applied_issues.iter().any(|applied| *applied == *issue))
            .cloned()
            .collect();

        CorrectionResult {
            original_text: input.text,
            corrected_text: outcome.corrected_text,
            applied: outcome.applied,
            remaining_issues,
        }
    }

    /// Produce up to ten writing suggestions. The targeted portion rides on
    /// `check` (and its cache); the heuristic portion works even when the
    /// remote service is down. Never errors.
    pub async fn suggest_improvements(&self, text: &str, language: &str) -> Vec<Suggestion> {
        let input = match normalize(text, language, &self.config.input) {
            Some(input) => input,
            None => return Vec::new(),
        };

        let result = self.check_normalized(&input).await;
        suggestions_for(&input.text, &result.issues, MAX_SUGGESTIONS)
    }

    async fn check_normalized(&self, input: &NormalizedInput) -> CheckResult {
        let started = Instant::now();
        let key = result_cache_key(&input.text, &input.language);

        if let Some(result) = self.cache.get(&key).await {
            return result;
        }

        // At most one in-flight computation per key
        let _guard = self.locks.lock(&key).await;

        // Another caller may have filled the cache while we queued
        if let Some(result) = self.cache.get(&key).await {
            return result;
        }

        self.limiter.acquire().await;

        let raw_matches = match self.client.analyze(&input.text, &input.language).await {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!(
                    "Remote analysis failed for language {}: {e} — degrading to no issues",
                    input.language
                );
                // Never cached: the next caller must retry the service
                return CheckResult::empty(CheckStatus::RemoteUnavailable);
            }
        };

        let issues = classify(&raw_matches, &input.text, &input.language);
        let reportable: Vec<Issue> = issues
            .into_iter()
            .filter(|issue| !self.filter.should_ignore(issue))
            .collect();

        let result = CheckResult::from_issues(reportable, started.elapsed().as_millis() as u64);

        let common = input.text.chars().count() < self.config.cache.common_text_chars;
        self.cache.set(&key, result.clone(), common).await;

        self.report_rule_hits(&result);

        result
    }

    /// Aggregate hits per rule id and hand them to the sink on a detached
    /// task. Failures are logged and swallowed.
    fn report_rule_hits(&self, result: &CheckResult) {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for issue in &result.issues {
            if issue.rule_id.is_empty() {
                continue;
            }
            *counts.entry(issue.rule_id.as_str()).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return;
        }

        let hits: Vec<RuleHit> = counts
            .into_iter()
            .map(|(rule_id, count)| {
                RuleHit::remote_analysis(
                    &self.config.telemetry.source_code,
                    &self.config.telemetry.mode,
                    rule_id,
                    count,
                )
            })
            .collect();

        let telemetry = Arc::clone(&self.telemetry);
        tokio::spawn(async move {
            if let Err(e) = telemetry.upsert_hits(hits).await {
                log::debug!("Rule-hit telemetry failed (ignored): {e}");
            }
        });
    }

    /// Result-cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop all cached results.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Permits currently available for remote calls.
    pub fn available_remote_permits(&self) -> usize {
        self.limiter.available_permits()
    }
}
