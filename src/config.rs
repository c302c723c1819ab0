use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Language tag used when the caller supplies an empty/whitespace tag.
pub const DEFAULT_LANGUAGE: &str = "en-US";

const DEFAULT_MAX_INPUT_CHARS: usize = 10_000;
const DEFAULT_REMOTE_ENDPOINT: &str = "http://localhost:8010/v2/check";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RATE_CAPACITY: usize = 60;
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;
const DEFAULT_CACHE_SHARDS: usize = 16;
const DEFAULT_STANDARD_TTL_SECS: u64 = 60 * 60;
const DEFAULT_COMMON_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_COMMON_TEXT_CHARS: usize = 50;
const DEFAULT_EVICT_FRACTION: f64 = 0.20;
const DEFAULT_IGNORE_FLOOR: u8 = 30;
const DEFAULT_SAFE_THRESHOLD: u8 = 85;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub input: InputConfig,
    pub remote: RemoteConfig,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
    pub rules: RuleConfig,
    pub telemetry: TelemetryConfig,
}

/// Input normalization limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum accepted input length in characters; longer text is truncated.
    pub max_chars: usize,
    /// Language tag substituted for empty/whitespace tags.
    pub default_language: String,
}

/// Remote analysis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Check endpoint, e.g. `http://localhost:8010/v2/check`.
    pub endpoint: String,
    /// Per-call timeout in seconds, applied at the network boundary.
    pub timeout_secs: u64,
}

/// Outbound rate limiting for the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Permit pool capacity (calls per window at steady state).
    pub capacity: usize,
    /// Refill window in seconds; one permit returns every `window/capacity`.
    pub window_secs: u64,
}

/// Result cache sizing and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on total cached results.
    pub max_entries: usize,
    /// Number of independent shards; unrelated keys never share a lock.
    pub shards: usize,
    /// Retention for ordinary text, in seconds.
    pub standard_ttl_secs: u64,
    /// Retention for short "common" text, in seconds.
    pub common_ttl_secs: u64,
    /// Text shorter than this (in characters) is treated as common.
    pub common_text_chars: usize,
    /// Fraction of a full shard evicted per compaction pass.
    pub evict_fraction: f64,
}

/// Confidence thresholds and rule-list extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Issues below this confidence are dropped everywhere.
    pub ignore_floor: u8,
    /// Minimum confidence for automatic correction.
    pub safe_threshold: u8,
    /// Rule ids ignored in addition to the built-in list.
    pub extra_ignored_rules: Vec<String>,
    /// Rule ids allowed for auto-correction in addition to the built-in list.
    pub extra_safe_rules: Vec<String>,
}

/// Identity attached to reported rule hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Dictionary-source code the pipeline is processing.
    pub source_code: String,
    /// Processing mode label.
    pub mode: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            remote: RemoteConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            rules: RuleConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_INPUT_CHARS,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RATE_CAPACITY,
            window_secs: DEFAULT_RATE_WINDOW_SECS,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            shards: DEFAULT_CACHE_SHARDS,
            standard_ttl_secs: DEFAULT_STANDARD_TTL_SECS,
            common_ttl_secs: DEFAULT_COMMON_TTL_SECS,
            common_text_chars: DEFAULT_COMMON_TEXT_CHARS,
            evict_fraction: DEFAULT_EVICT_FRACTION,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            ignore_floor: DEFAULT_IGNORE_FLOOR,
            safe_threshold: DEFAULT_SAFE_THRESHOLD,
            extra_ignored_rules: Vec::new(),
            extra_safe_rules: Vec::new(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            source_code: "default".to_string(),
            mode: "enhance".to_string(),
        }
    }
}

impl RemoteConfig {
    /// Per-call timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RateLimitConfig {
    /// Interval between refill ticks: `window / capacity`.
    pub fn refill_interval(&self) -> Duration {
        let capacity = self.capacity.max(1) as u32;
        Duration::from_secs(self.window_secs.max(1)) / capacity
    }
}

impl GatewayConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from a TOML file.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded gateway config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse gateway config at {}: {e} — using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No gateway config at {} — using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
