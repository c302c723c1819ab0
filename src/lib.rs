//! lexigate — Grammar Correction Gateway
//!
//! Checks text against a remote linguistic-analysis service, classifies and
//! filters the reported issues by confidence, optionally splices a safe
//! subset of corrections back into the text, and caches outcomes so a batch
//! import never pays for the same phrase twice.
//!
//! ## Architecture
//!
//! ```text
//! check(text, lang)
//!        │
//!        ▼
//! ┌──────────────────────────────┐
//! │  1. Normalize                │  trim, bound length, default language
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │  2. Cache lookup             │  SHA-256(lang:text) — hit ⇒ return
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │  3. Stampede guard           │  one in-flight computation per key,
//! │     + cache re-check         │  waiters observe the single result
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │  4. Rate limit + remote call │  token bucket, fail-open on error
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │  5. Classify + filter        │  clamp offsets, score confidence,
//! │     + cache store            │  drop noise; failures never cached
//! └──────────────────────────────┘
//! ```
//!
//! `auto_correct` runs the same flow, then applies the allow-listed,
//! high-confidence subset of issues right-to-left so no edit invalidates the
//! offsets of another. `suggest_improvements` adds heuristics that keep
//! working when the remote service is down.

pub mod apply;
pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod rate_limit;
pub mod remote;
pub mod rules;
pub mod stampede;
pub mod suggest;
pub mod telemetry;


pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::GrammarGateway;
pub use models::{
    AppliedCorrection, CheckResult, CheckStatus, CorrectionResult, Issue, IssueCategory,
    Suggestion,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
