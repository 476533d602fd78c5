use std::fmt::Write as _;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (characters, roster_version, loaded_at) = {
        let snapshot = state.roster.read().await;
        (
            snapshot.roster.len(),
            snapshot.version,
            snapshot.loaded_at.map(|t| t.to_rfc3339()),
        )
    };
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "characters": characters,
        "roster_version": roster_version,
        "roster_loaded_at": loaded_at,
        "page_cache_size": state.page_cache.len(),
        "observability": {
            "rankings_requests_total": observability.rankings_requests_total,
            "rankings_cache_hits_total": observability.rankings_cache_hits_total,
            "rankings_cache_misses_total": observability.rankings_cache_misses_total,
            "rankings_rejected_total": observability.rankings_rejected_total,
            "roster_reloads_total": observability.roster_reloads_total,
            "roster_reload_failures_total": observability.roster_reload_failures_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let (characters, roster_version) = {
        let snapshot = state.roster.read().await;
        (snapshot.roster.len(), snapshot.version)
    };
    let body = render_prometheus_metrics(
        characters,
        roster_version,
        state.page_cache.len(),
        state.observability.snapshot(),
    );

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn write_metric(body: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(body, "# HELP {name} {help}");
    let _ = writeln!(body, "# TYPE {name} {kind}");
    let _ = writeln!(body, "{name} {value}");
}

fn render_prometheus_metrics(
    characters: usize,
    roster_version: u64,
    page_cache_size: usize,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    write_metric(
        &mut body,
        "rankboard_characters",
        "gauge",
        "Characters in the loaded roster.",
        characters as u64,
    );
    write_metric(
        &mut body,
        "rankboard_roster_version",
        "gauge",
        "Number of roster loads since startup.",
        roster_version,
    );
    write_metric(
        &mut body,
        "rankboard_page_cache_size",
        "gauge",
        "Rankings pages currently cached.",
        page_cache_size as u64,
    );
    write_metric(
        &mut body,
        "rankboard_rankings_requests_total",
        "counter",
        "Total /api/rankings requests.",
        observability.rankings_requests_total,
    );
    write_metric(
        &mut body,
        "rankboard_rankings_cache_hits_total",
        "counter",
        "Rankings pages served from cache.",
        observability.rankings_cache_hits_total,
    );
    write_metric(
        &mut body,
        "rankboard_rankings_cache_misses_total",
        "counter",
        "Rankings pages computed from the roster.",
        observability.rankings_cache_misses_total,
    );
    write_metric(
        &mut body,
        "rankboard_rankings_rejected_total",
        "counter",
        "Rankings requests rejected with 400.",
        observability.rankings_rejected_total,
    );
    write_metric(
        &mut body,
        "rankboard_roster_reloads_total",
        "counter",
        "Successful roster reloads.",
        observability.roster_reloads_total,
    );
    write_metric(
        &mut body,
        "rankboard_roster_reload_failures_total",
        "counter",
        "Roster reloads that failed to read or parse the file.",
        observability.roster_reload_failures_total,
    );
    body
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

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

    #[test]
    fn metrics_output_contains_prometheus_help_type_and_values() {
        let observability = ObservabilitySnapshot {
            rankings_requests_total: 12,
            rankings_cache_hits_total: 8,
            rankings_cache_misses_total: 4,
            rankings_rejected_total: 2,
            roster_reloads_total: 3,
            roster_reload_failures_total: 1,
        };

        let metrics = render_prometheus_metrics(42, 3, 5, observability);

        assert!(metrics.contains("# HELP rankboard_characters"));
        assert!(metrics.contains("# TYPE rankboard_rankings_requests_total counter"));
        assert!(metrics.contains("# TYPE rankboard_page_cache_size gauge"));
        assert!(metrics.contains("rankboard_characters 42"));
        assert!(metrics.contains("rankboard_roster_version 3"));
        assert!(metrics.contains("rankboard_page_cache_size 5"));
        assert!(metrics.contains("rankboard_rankings_requests_total 12"));
        assert!(metrics.contains("rankboard_rankings_cache_hits_total 8"));
        assert!(metrics.contains("rankboard_rankings_cache_misses_total 4"));
        assert!(metrics.contains("rankboard_rankings_rejected_total 2"));
        assert!(metrics.contains("rankboard_roster_reloads_total 3"));
        assert!(metrics.contains("rankboard_roster_reload_failures_total 1"));
    }

    #[tokio::test]
    async fn health_reports_roster_and_cache() {
        let state = AppState::with_roster(sample_roster()).await;
        let (addr, server_handle) = spawn_test_server(state).await;

        let health = reqwest::get(format!("http://{addr}/api/health"))
            .await
            .expect("health request")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health["status"], "ok");
        assert_eq!(health["characters"], 6);
        assert_eq!(health["roster_version"], 1);
        assert_eq!(health["page_cache_size"], 0);
        assert_eq!(health["observability"]["rankings_requests_total"], 0);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn metrics_endpoint_is_not_cached() {
        let (addr, server_handle) = spawn_test_server(AppState::new()).await;

        let response = reqwest::get(format!("http://{addr}/api/metrics"))
            .await
            .expect("metrics request");
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let body = response.text().await.expect("metrics body");
        assert!(body.contains("rankboard_characters 0"));

        server_handle.abort();
        let _ = server_handle.await;
    }
}
