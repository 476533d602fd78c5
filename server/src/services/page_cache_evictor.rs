use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::config::PAGE_CACHE_EVICTION_SECS;
use crate::state::AppState;

pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(Duration::from_secs(PAGE_CACHE_EVICTION_SECS));

    loop {
        interval.tick().await;

        let evicted = evict_expired(&state);
        if evicted > 0 {
            info!(
                "evicted {evicted} stale rankings pages ({} remaining)",
                state.page_cache.len()
            );
        }
    }
}

fn evict_expired(state: &AppState) -> usize {
    let before = state.page_cache.len();
    let now = Utc::now();
    let ttl = state.page_cache_ttl_secs;

    state
        .page_cache
        .retain(|_, cached| now.signed_duration_since(cached.cached_at).num_seconds() < ttl);

    before.saturating_sub(state.page_cache.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::state::CachedPage;

    fn page(age_secs: i64) -> CachedPage {
        CachedPage {
            json: Arc::new(Bytes::from_static(b"{}")),
            etag: "\"rankings-1-00000000\"".into(),
            cached_at: Utc::now() - ChronoDuration::seconds(age_secs),
        }
    }

    #[test]
    fn evicts_only_pages_older_than_ttl() {
        let mut state = AppState::new();
        state.page_cache_ttl_secs = 30;
        state.page_cache.insert("fresh".into(), page(1));
        state.page_cache.insert("stale".into(), page(45));

        assert_eq!(evict_expired(&state), 1);
        assert!(state.page_cache.contains_key("fresh"));
        assert!(!state.page_cache.contains_key("stale"));
    }
}
