//! Result Cache
//!
//! TTL-based in-memory store of previously computed check results, keyed by
//! a digest of the normalized input. Short "common" text (phrases that recur
//! constantly across a batch import) is retained longer and evicted last.
//!
//! The map is sharded so unrelated keys never contend on one lock; each
//! shard compacts independently once it reaches its bound. Results of failed
//! remote calls are never stored — a later caller must retry the service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::config::CacheConfig;
use crate::models::{CheckResult, CheckStatus};

// ============================================================================
// Cache Key
// ============================================================================

/// Derive the fixed-length cache key for a normalized input.
///
/// SHA-256 of `language + ":" + text`, hex-encoded. Deterministic, and keeps
/// raw text out of the map keys so memory stays bounded by entry count.
pub fn result_cache_key(text: &str, language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(language.as_bytes());
    hasher.update(b":");
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

// ============================================================================
// Entries
// ============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    result: CheckResult,
    inserted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    common: bool,
}

impl CacheEntry {
    fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Cache statistics snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entry_count: usize,
    pub common_entry_count: usize,
    /// Cache hit rate (0.0 - 1.0)
    pub hit_rate: f64,
    /// Age of the oldest live entry, in seconds
    pub oldest_entry_age_secs: i64,
}

impl CacheStats {
    fn calculate_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        };
    }
}

// ============================================================================
// Result Cache
// ============================================================================

/// Sharded TTL cache of check results.
pub struct ResultCache {
    shards: Vec<RwLock<HashMap<String, CacheEntry>>>,
    per_shard_cap: usize,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        let shard_count = config.shards.max(1);
        let per_shard_cap = (config.max_entries / shard_count).max(1);
        let shards = (0..shard_count)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();

        Self {
            shards,
            per_shard_cap,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn shard_index(&self, key: &str) -> usize {
        // Keys are hex digests; the first byte already distributes uniformly.
        key.as_bytes().first().copied().unwrap_or(0) as usize % self.shards.len()
    }

    /// Look up a cached result. Expired entries count as misses and are
    /// dropped on the spot.
    pub async fn get(&self, key: &str) -> Option<CheckResult> {
        let now = Utc::now();
        let shard = &self.shards[self.shard_index(key)];

        {
            let entries = shard.read().await;
            match entries.get(key) {
                Some(entry) if !entry.expired(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.result.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired: re-check under the write lock before removing, because a
        // fresh entry may have replaced it while we upgraded.
        let mut entries = shard.write().await;
        if let Some(entry) = entries.get(key) {
            if !entry.expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.result.clone());
            }
        }
        entries.remove(key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result. `common` selects the longer retention tier used for
    /// short, frequently repeated text.
    ///
    /// Degraded results are never stored: a failed remote call must be
    /// retried by a later caller, not frozen into the cache.
    pub async fn set(&self, key: &str, result: CheckResult, common: bool) {
        if result.status != CheckStatus::Ok {
            log::debug!("Refusing to cache degraded result ({:?})", result.status);
            return;
        }

        let now = Utc::now();
        let ttl_secs = if common {
            self.config.common_ttl_secs
        } else {
            self.config.standard_ttl_secs
        };
        let entry = CacheEntry {
            result,
            inserted_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
            common,
        };

        let shard = &self.shards[self.shard_index(key)];
        let mut entries = shard.write().await;
        entries.insert(key.to_string(), entry);

        if entries.len() > self.per_shard_cap {
            self.compact(&mut entries, now);
        }
    }

    /// Percentage-based compaction of one shard: expired entries go first,
    /// then ordinary entries by earliest expiry, then common entries by
    /// earliest expiry — short common text survives longest under pressure.
    fn compact(&self, entries: &mut HashMap<String, CacheEntry>, now: DateTime<Utc>) {
        let target = ((entries.len() as f64 * self.config.evict_fraction).ceil() as usize).max(1);

        let mut candidates: Vec<(String, bool, bool, DateTime<Utc>)> = entries
            .iter()
            .map(|(k, e)| (k.clone(), e.expired(now), e.common, e.expires_at))
            .collect();
        candidates.sort_by(|a, b| {
            b.1.cmp(&a.1) // expired first
                .then(a.2.cmp(&b.2)) // ordinary before common
                .then(a.3.cmp(&b.3)) // earliest expiry first
        });

        for (key, _, _, _) in candidates.into_iter().take(target) {
            entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove all entries.
    pub async fn clear(&self) {
        for shard in &self.shards {
            shard.write().await.clear();
        }
    }

    /// Total number of entries across all shards.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Statistics snapshot.
    pub async fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: 0,
            common_entry_count: 0,
            hit_rate: 0.0,
            oldest_entry_age_secs: 0,
        };

        for shard in &self.shards {
            let entries = shard.read().await;
            stats.entry_count += entries.len();
            stats.common_entry_count += entries.values().filter(|e| e.common).count();
            for entry in entries.values() {
                let age = (now - entry.inserted_at).num_seconds();
                if age > stats.oldest_entry_age_secs {
                    stats.oldest_entry_age_secs = age;
                }
            }
        }

        stats.calculate_hit_rate();
        stats
    }
}
