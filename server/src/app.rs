use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new("client/dist")
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(apply_static_cache_policy));

    let app = Router::new()
        .route("/api/rankings", get(routes::rankings::get_rankings))
        .route("/api/rankings/jobs", get(routes::rankings::get_jobs))
        .route("/api/health", get(routes::api::health))
        .route("/api/metrics", get(routes::api::metrics));

    app.layer(CompressionLayer::new())
        .fallback_service(static_assets)
        .with_state(state)
}

/// How long browsers may keep a file served from `client/dist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StaticCachePolicy {
    /// Trunk bundles carry a content hash in the file name.
    Immutable,
    /// Job icons and other art under `/assets/`.
    OneDay,
}

impl StaticCachePolicy {
    fn for_path(path: &str) -> Option<Self> {
        let file = path.rsplit('/').next().unwrap_or(path);
        let (stem, ext) = file.rsplit_once('.')?;
        match ext {
            "wasm" | "js" | "css" if has_content_hash(stem) => Some(Self::Immutable),
            _ if path.starts_with("/assets/") => Some(Self::OneDay),
            _ => None,
        }
    }

    fn header_value(self) -> HeaderValue {
        match self {
            Self::Immutable => HeaderValue::from_static("public, max-age=31536000, immutable"),
            Self::OneDay => HeaderValue::from_static("public, max-age=86400"),
        }
    }
}

fn has_content_hash(stem: &str) -> bool {
    stem.split(['-', '_', '.'])
        .any(|part| part.len() >= 8 && part.bytes().all(|b| b.is_ascii_hexdigit()))
}

async fn apply_static_cache_policy(request: Request, next: Next) -> Response {
    let policy = StaticCachePolicy::for_path(request.uri().path());
    let mut response = next.run(request).await;

    if let Some(policy) = policy
        && response.status().is_success()
    {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, policy.header_value());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_bundles_are_immutable() {
        assert_eq!(
            StaticCachePolicy::for_path("/rankboard-client-71578f6b278221f3_bg.wasm"),
            Some(StaticCachePolicy::Immutable)
        );
        assert_eq!(
            StaticCachePolicy::for_path("/style-a93762ff3bf6d63a.css"),
            Some(StaticCachePolicy::Immutable)
        );
        assert_eq!(
            StaticCachePolicy::Immutable.header_value(),
            "public, max-age=31536000, immutable"
        );
    }

    #[test]
    fn job_icons_are_cached_for_a_day() {
        assert_eq!(
            StaticCachePolicy::for_path("/assets/job-icons/warrior.png"),
            Some(StaticCachePolicy::OneDay)
        );
        assert_eq!(StaticCachePolicy::OneDay.header_value(), "public, max-age=86400");
    }

    #[test]
    fn html_and_unhashed_bundles_keep_default_headers() {
        assert_eq!(StaticCachePolicy::for_path("/"), None);
        assert_eq!(StaticCachePolicy::for_path("/index.html"), None);
        assert_eq!(StaticCachePolicy::for_path("/app.js"), None);
        assert_eq!(StaticCachePolicy::for_path("/assets"), None);
    }
}
