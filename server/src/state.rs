use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::config::{max_page_cache_entries, page_cache_ttl_secs, page_size, roster_path};
use crate::roster::{CharacterRecord, Roster};

/// Current roster plus the version stamped into cache keys and ETags.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub version: u64,
    pub roster: Arc<Roster>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Pre-serialized rankings page, shared by every request for the same filters.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub json: Arc<Bytes>,
    pub etag: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<RwLock<RosterSnapshot>>,
    pub page_cache: Arc<DashMap<String, CachedPage>>,
    pub roster_path: PathBuf,
    pub page_size: u32,
    pub page_cache_ttl_secs: i64,
    pub max_page_cache_entries: usize,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    rankings_requests_total: AtomicU64,
    rankings_cache_hits_total: AtomicU64,
    rankings_cache_misses_total: AtomicU64,
    rankings_rejected_total: AtomicU64,
    roster_reloads_total: AtomicU64,
    roster_reload_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub rankings_requests_total: u64,
    pub rankings_cache_hits_total: u64,
    pub rankings_cache_misses_total: u64,
    pub rankings_rejected_total: u64,
    pub roster_reloads_total: u64,
    pub roster_reload_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            rankings_requests_total: self.rankings_requests_total.load(Ordering::Relaxed),
            rankings_cache_hits_total: self.rankings_cache_hits_total.load(Ordering::Relaxed),
            rankings_cache_misses_total: self.rankings_cache_misses_total.load(Ordering::Relaxed),
            rankings_rejected_total: self.rankings_rejected_total.load(Ordering::Relaxed),
            roster_reloads_total: self.roster_reloads_total.load(Ordering::Relaxed),
            roster_reload_failures_total: self
                .roster_reload_failures_total
                .load(Ordering::Relaxed),
        }
    }

    pub fn record_rankings_request(&self) {
        self.rankings_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rankings_cache_hit(&self) {
        self.rankings_cache_hits_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rankings_cache_miss(&self) {
        self.rankings_cache_misses_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rankings_rejected(&self) {
        self.rankings_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_roster_reload(&self) {
        self.roster_reloads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_roster_reload_failure(&self) {
        self.roster_reload_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            roster: Arc::new(RwLock::new(RosterSnapshot::default())),
            page_cache: Arc::new(DashMap::new()),
            roster_path: roster_path(),
            page_size: page_size(),
            page_cache_ttl_secs: page_cache_ttl_secs(),
            max_page_cache_entries: max_page_cache_entries(),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    /// Swap in a new roster and drop every cached page built from the old one.
    pub async fn replace_roster(&self, characters: Vec<CharacterRecord>) -> u64 {
        let roster = Arc::new(Roster::new(characters));
        let version = {
            let mut snapshot = self.roster.write().await;
            snapshot.version += 1;
            snapshot.roster = roster;
            snapshot.loaded_at = Some(Utc::now());
            snapshot.version
        };
        self.page_cache.clear();
        version
    }

    #[cfg(test)]
    pub async fn with_roster(characters: Vec<CharacterRecord>) -> Self {
        let state = Self::new();
        state.replace_roster(characters).await;
        state
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
