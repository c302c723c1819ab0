//! Remote Analysis Client
//!
//! Boundary to the linguistic-analysis service. The gateway treats the
//! service as idempotent for identical input and performs no retries of its
//! own; any failure here degrades to "no issues" upstream.
//!
//! The response schema is loosely typed on the wire, so every field is
//! optional here and absence is decided at the classification boundary
//! rather than through dynamic access.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::RemoteConfig;

// ============================================================================
// Errors
// ============================================================================

/// Errors from the remote analysis boundary.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed analysis payload: {0}")]
    Malformed(String),

    #[error("Invalid analysis endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl RemoteError {
    /// Whether the failure was a network-boundary timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

// ============================================================================
// Wire Types
// ============================================================================

/// One raw match reported by the analysis service.
///
/// Offsets are relative to the submitted text. Fields the service omits stay
/// `None`; the classifier decides what an unusable record is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatch {
    pub offset: Option<usize>,
    pub length: Option<usize>,
    pub message: Option<String>,
    pub rule: Option<RawRule>,
    pub replacements: Vec<RawReplacement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRule {
    pub id: Option<String>,
    pub description: Option<String>,
    pub category: Option<RawCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReplacement {
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckResponse {
    matches: Vec<RawMatch>,
}

// ============================================================================
// Client
// ============================================================================

/// Boundary trait for the analysis service, injected into the gateway so
/// tests can substitute counting/failing doubles.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze `text` in `language`, returning raw matches.
    ///
    /// Must behave idempotently for identical input; the gateway never
    /// retries.
    async fn analyze(&self, text: &str, language: &str) -> RemoteResult<Vec<RawMatch>>;
}

/// HTTP client for a LanguageTool-style `/v2/check` endpoint.
pub struct HttpAnalysisClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    /// Build the client. The per-call timeout from `config` is applied at
    /// the network boundary, so cancellation and slow services both resolve
    /// there.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, text: &str, language: &str) -> RemoteResult<Vec<RawMatch>> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("text", text), ("language", language)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: CheckResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        Ok(payload.matches)
    }
}
