use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use chrono::Utc;
use rankboard_shared::jobs::{is_known_category, job_categories};
use rankboard_shared::{ALL_JOBS, JobCategory, RankingFilters};
use serde::Deserialize;

use crate::config::MAX_SEARCH_LEN;
use crate::routes::{if_none_match_matches, json_bytes_response, not_modified_response};
use crate::state::{AppState, CachedPage};

const RANKINGS_CACHE_CONTROL: &str = "public, max-age=10";

#[derive(Debug, Default, Deserialize)]
pub struct RankingsQuery {
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub viewer: Option<u64>,
}

pub async fn get_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    state.observability.record_rankings_request();

    let filters = match normalize_filters(&query) {
        Ok(filters) => filters,
        Err(status) => {
            state.observability.record_rankings_rejected();
            return Err(status);
        }
    };

    let (version, roster) = {
        let snapshot = state.roster.read().await;
        (snapshot.version, Arc::clone(&snapshot.roster))
    };
    let key = cache_key(version, &filters, query.viewer);
    let now = Utc::now();

    let cached = state.page_cache.get(&key).and_then(|entry| {
        let age = now.signed_duration_since(entry.cached_at).num_seconds();
        (age < state.page_cache_ttl_secs).then(|| (Arc::clone(&entry.json), entry.etag.clone()))
    });

    let (json, etag) = match cached {
        Some(hit) => {
            state.observability.record_rankings_cache_hit();
            hit
        }
        None => {
            state.observability.record_rankings_cache_miss();
            let response = roster.query(&filters, query.viewer, state.page_size);
            let body = serde_json::to_vec(&response).map_err(|e| {
                tracing::error!(error = %e, "failed to serialize rankings response");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            let etag = rankings_etag(version, &body);
            let json = Arc::new(Bytes::from(body));
            cache_page(&state, key, Arc::clone(&json), etag.clone());
            (json, etag)
        }
    };

    if if_none_match_matches(&headers, &etag) {
        return Ok(not_modified_response(
            RANKINGS_CACHE_CONTROL,
            Some(etag.as_str()),
        ));
    }

    Ok(json_bytes_response(
        (*json).clone(),
        RANKINGS_CACHE_CONTROL,
        Some(etag.as_str()),
    ))
}

pub async fn get_jobs() -> Json<Vec<JobCategory>> {
    Json(job_categories())
}

fn normalize_filters(query: &RankingsQuery) -> Result<RankingFilters, StatusCode> {
    let job = query
        .job
        .as_deref()
        .map(str::trim)
        .filter(|job| !job.is_empty())
        .unwrap_or(ALL_JOBS)
        .to_ascii_lowercase();
    if !is_known_category(&job) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let search = query.search.as_deref().unwrap_or_default().trim();
    if search.chars().count() > MAX_SEARCH_LEN || search.chars().any(char::is_control) {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(RankingFilters {
        job,
        search: search.to_string(),
        page: query.page.unwrap_or(1).max(1),
    })
}

fn cache_key(version: u64, filters: &RankingFilters, viewer: Option<u64>) -> String {
    let viewer = viewer.map(|v| v.to_string()).unwrap_or_default();
    format!(
        "{version}|{}|{}|{}|{viewer}",
        filters.job,
        filters.search.to_lowercase(),
        filters.page
    )
}

fn rankings_etag(version: u64, body: &[u8]) -> String {
    format!("\"rankings-{version}-{:08x}\"", crc32fast::hash(body))
}

fn cache_page(state: &AppState, key: String, json: Arc<Bytes>, etag: String) {
    if !state.page_cache.contains_key(&key) {
        while state.page_cache.len() >= state.max_page_cache_entries {
            if !evict_oldest_page(state) {
                break;
            }
        }
    }

    state.page_cache.insert(
        key,
        CachedPage {
            json,
            etag,
            cached_at: Utc::now(),
        },
    );
}

fn evict_oldest_page(state: &AppState) -> bool {
    let Some(oldest_key) = state
        .page_cache
        .iter()
        .min_by_key(|entry| entry.value().cached_at)
        .map(|entry| entry.key().clone())
    else {
        return false;
    };
    state.page_cache.remove(&oldest_key).is_some()
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use rankboard_shared::RankingsResponse;

    use super::*;
    use crate::roster::tests::sample_roster;

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    fn query(job: Option<&str>, search: Option<&str>, page: Option<u32>) -> RankingsQuery {
        RankingsQuery {
            job: job.map(str::to_owned),
            search: search.map(str::to_owned),
            page,
            viewer: None,
        }
    }

    #[test]
    fn normalize_filters_applies_defaults() {
        let filters = normalize_filters(&RankingsQuery::default()).expect("defaults are valid");
        assert_eq!(filters, RankingFilters::default());

        let filters = normalize_filters(&query(Some(" Pirate "), Some("  Dan "), Some(0)))
            .expect("valid filters");
        assert_eq!(filters.job, "pirate");
        assert_eq!(filters.search, "Dan");
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn normalize_filters_rejects_unknown_jobs_and_long_searches() {
        assert_eq!(
            normalize_filters(&query(Some("gm"), None, None)),
            Err(StatusCode::BAD_REQUEST)
        );
        let long = "x".repeat(MAX_SEARCH_LEN + 1);
        assert_eq!(
            normalize_filters(&query(None, Some(&long), None)),
            Err(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            normalize_filters(&query(None, Some("a\u{7}b"), None)),
            Err(StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn cache_key_ignores_search_case_but_not_viewer() {
        let a = RankingFilters {
            search: "DAN".into(),
            ..RankingFilters::default()
        };
        let b = RankingFilters {
            search: "dan".into(),
            ..RankingFilters::default()
        };
        assert_eq!(cache_key(1, &a, None), cache_key(1, &b, None));
        assert_ne!(cache_key(1, &a, None), cache_key(1, &a, Some(9)));
        assert_ne!(cache_key(1, &a, None), cache_key(2, &a, None));
    }

    #[tokio::test]
    async fn cache_evicts_oldest_page_when_full() {
        let mut state = AppState::new();
        state.max_page_cache_entries = 2;
        for key in ["a", "b", "c"] {
            cache_page(
                &state,
                key.to_string(),
                Arc::new(Bytes::from_static(b"{}")),
                "\"x\"".into(),
            );
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        assert_eq!(state.page_cache.len(), 2);
        assert!(!state.page_cache.contains_key("a"));
    }

    #[tokio::test]
    async fn rankings_endpoint_filters_and_paginates() {
        let state = AppState::with_roster(sample_roster()).await;
        let (addr, server_handle) = spawn_test_server(state).await;
        let base_url = format!("http://{addr}");

        let response = reqwest::Client::new()
            .get(format!("{base_url}/api/rankings?job=pirate&viewer=10"))
            .send()
            .await
            .expect("rankings request")
            .error_for_status()
            .expect("rankings status")
            .json::<RankingsResponse>()
            .await
            .expect("parse rankings");

        let names: Vec<_> = response.rankings.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Corsair", "Alt"]);
        assert!(response.rankings[1].is_current_user);
        assert_eq!(response.pagination.total_items, 2);
        assert_eq!(
            response.user_ranking.map(|e| (e.name, e.rank)),
            Some(("Dan".to_string(), 3))
        );

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn rankings_endpoint_rejects_unknown_job() {
        let state = AppState::with_roster(sample_roster()).await;
        let (addr, server_handle) = spawn_test_server(state.clone()).await;

        let status = reqwest::Client::new()
            .get(format!("http://{addr}/api/rankings?job=wizard"))
            .send()
            .await
            .expect("rankings request")
            .status();

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(state.observability.snapshot().rankings_rejected_total, 1);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn rankings_endpoint_returns_not_modified_and_serves_from_cache() {
        let state = AppState::with_roster(sample_roster()).await;
        let (addr, server_handle) = spawn_test_server(state.clone()).await;
        let url = format!("http://{addr}/api/rankings?search=dan");
        let client = reqwest::Client::new();

        let first = client.get(&url).send().await.expect("first request");
        assert_eq!(first.status(), reqwest::StatusCode::OK);
        let etag = first
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("etag header should be present");
        assert!(etag.starts_with("\"rankings-1-"));

        let second = client
            .get(&url)
            .header(reqwest::header::IF_NONE_MATCH, etag)
            .send()
            .await
            .expect("conditional request");
        assert_eq!(second.status(), reqwest::StatusCode::NOT_MODIFIED);

        let observability = state.observability.snapshot();
        assert_eq!(observability.rankings_cache_misses_total, 1);
        assert_eq!(observability.rankings_cache_hits_total, 1);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn roster_replacement_invalidates_cached_pages() {
        let state = AppState::with_roster(sample_roster()).await;
        let (addr, server_handle) = spawn_test_server(state.clone()).await;
        let url = format!("http://{addr}/api/rankings");
        let client = reqwest::Client::new();

        let before = client
            .get(&url)
            .send()
            .await
            .expect("request")
            .json::<RankingsResponse>()
            .await
            .expect("parse");
        assert_eq!(before.pagination.total_items, 6);

        state.replace_roster(Vec::new()).await;
        assert!(state.page_cache.is_empty());

        let after = client
            .get(&url)
            .send()
            .await
            .expect("request")
            .json::<RankingsResponse>()
            .await
            .expect("parse");
        assert!(after.rankings.is_empty());
        assert_eq!(after.pagination.total_items, 0);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn jobs_endpoint_lists_categories() {
        use tower::ServiceExt;

        let app = crate::app::build_app(AppState::new());
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/rankings/jobs")
                    .body(axum::body::Body::empty())
                    .expect("request"),
            )
            .await
            .expect("jobs response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let jobs: Vec<JobCategory> = serde_json::from_slice(&body).expect("parse jobs");
        assert_eq!(jobs.first().map(|j| j.value.as_str()), Some("all"));
        assert!(jobs.iter().any(|j| j.value == "archer" && j.label == "Bowman"));
    }
}
