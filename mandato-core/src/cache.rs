//! In-memory command result cache with TTL and FIFO capacity eviction.
//!
//! Entries are keyed by normalized command text and considered valid only
//! while younger than the TTL; stale entries are treated as absent on
//! lookup but are not physically purged until capacity eviction reaches
//! them. Eviction is FIFO by insertion order — entries are not touched on
//! read, so this deliberately approximates LRU rather than implementing it
//! (see DESIGN.md for the open question).

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::ResultData;

/// Entry lifetime: 5 minutes.
pub const COMMAND_CACHE_TTL: Duration = Duration::from_millis(300_000);

/// Maximum number of cached command results.
pub const MAX_CACHE_SIZE: usize = 50;

struct CacheEntry {
    data: ResultData,
    inserted: Instant,
}

/// Process-local memoization of command outcomes.
///
/// Not shared across processes and carries no persistence guarantee.
pub struct CommandCache {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest at the front. Re-inserting an existing key
    /// refreshes its timestamp but keeps its original position.
    order: VecDeque<String>,
    ttl: Duration,
    capacity: usize,
}

impl CommandCache {
    pub fn new() -> Self {
        Self::with_limits(COMMAND_CACHE_TTL, MAX_CACHE_SIZE)
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(64)),
            order: VecDeque::with_capacity(capacity.min(64)),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Cache key for a command text: trimmed and lower-cased.
    pub fn normalize_key(text: &str) -> String {
        text.trim().to_lowercase()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a fresh entry for `key`, using the current time.
    pub fn lookup(&self, key: &str) -> Option<ResultData> {
        self.lookup_at(key, Instant::now())
    }

    /// Look up a fresh entry for `key` as of `now`.
    ///
    /// A stale entry is reported as absent but left in place.
    pub fn lookup_at(&self, key: &str, now: Instant) -> Option<ResultData> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.inserted) < self.ttl {
            Some(entry.data.clone())
        } else {
            debug!(key, "cache entry stale — treated as miss");
            None
        }
    }

    /// Insert `data` under `key`, using the current time.
    pub fn insert(&mut self, key: String, data: ResultData) {
        self.insert_at(key, data, Instant::now());
    }

    /// Insert `data` under `key` as of `now`, evicting the oldest-inserted
    /// entry first once at capacity.
    pub fn insert_at(&mut self, key: String, data: ResultData, now: Instant) {
        if let Some(existing) = self.entries.get_mut(&key) {
            existing.data = data;
            existing.inserted = now;
            return;
        }

        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                debug!(key = %oldest, "cache capacity reached — evicting oldest entry");
                self.entries.remove(&oldest);
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, CacheEntry { data, inserted: now });
    }

    /// Drop every entry unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for CommandCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_stub(tag: &str) -> ResultData {
        ResultData {
            command_id: Some(1),
            report_type: Some(tag.to_string()),
            title: None,
            confidence: Some(0.9),
            processing_time_ms: Some(10),
            error_message: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn key_normalization_trims_and_lowercases() {
        assert_eq!(
            CommandCache::normalize_key("  Reporte de VENTAS  "),
            "reporte de ventas"
        );
    }

    #[test]
    fn fresh_entry_hits() {
        let mut cache = CommandCache::new();
        cache.insert("ventas".into(), result_stub("ventas"));
        let hit = cache.lookup("ventas").expect("fresh entry");
        assert_eq!(hit.report_type.as_deref(), Some("ventas"));
    }

    #[test]
    fn stale_entry_misses_but_stays_physically_present() {
        let mut cache = CommandCache::new();
        let t0 = Instant::now();
        cache.insert_at("ventas".into(), result_stub("ventas"), t0);

        assert!(cache
            .lookup_at("ventas", t0 + COMMAND_CACHE_TTL - Duration::from_millis(1))
            .is_some());
        assert!(cache.lookup_at("ventas", t0 + COMMAND_CACHE_TTL).is_none());
        // Treated as absent, not purged.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fifty_first_insert_evicts_exactly_the_earliest() {
        let mut cache = CommandCache::new();
        let t0 = Instant::now();
        for i in 0..MAX_CACHE_SIZE {
            cache.insert_at(format!("cmd-{i}"), result_stub("r"), t0);
        }
        assert_eq!(cache.len(), MAX_CACHE_SIZE);

        cache.insert_at("cmd-extra".into(), result_stub("r"), t0);
        assert_eq!(cache.len(), MAX_CACHE_SIZE);
        assert!(cache.lookup_at("cmd-0", t0).is_none());
        assert!(cache.lookup_at("cmd-1", t0).is_some());
        assert!(cache.lookup_at("cmd-extra", t0).is_some());
    }

    #[test]
    fn reinsert_refreshes_timestamp_without_moving_position() {
        let mut cache = CommandCache::with_limits(COMMAND_CACHE_TTL, 2);
        let t0 = Instant::now();
        cache.insert_at("a".into(), result_stub("a1"), t0);
        cache.insert_at("b".into(), result_stub("b"), t0);

        // Refresh "a": stays the oldest-inserted key.
        cache.insert_at("a".into(), result_stub("a2"), t0 + Duration::from_secs(1));
        cache.insert_at("c".into(), result_stub("c"), t0 + Duration::from_secs(2));

        assert!(cache.lookup_at("a", t0 + Duration::from_secs(2)).is_none());
        assert!(cache.lookup_at("b", t0 + Duration::from_secs(2)).is_some());
        assert!(cache.lookup_at("c", t0 + Duration::from_secs(2)).is_some());
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = CommandCache::new();
        cache.insert("ventas".into(), result_stub("r"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.lookup("ventas").is_none());
    }
}
