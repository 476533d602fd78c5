use gloo_storage::Storage;
use rankboard_shared::{FetchError, JobCategory, RankingFilters, RankingsResponse, RankingsSource};

/// LocalStorage key holding the signed-in account id.
pub const VIEWER_STORAGE_KEY: &str = "rankboard_viewer";

/// Account id of the viewer, if the host page stored one.
pub fn stored_viewer() -> Option<u64> {
    gloo_storage::LocalStorage::get::<u64>(VIEWER_STORAGE_KEY).ok()
}

pub fn rankings_url(filters: &RankingFilters, viewer: Option<u64>) -> String {
    let mut url = format!("/api/rankings?{}", filters.to_query());
    if let Some(viewer) = viewer {
        url.push_str(&format!("&viewer={viewer}"));
    }
    url
}

/// Rankings fetched from the server's `/api/rankings` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRankingsSource {
    pub viewer: Option<u64>,
}

impl RankingsSource for HttpRankingsSource {
    async fn fetch(&self, filters: &RankingFilters) -> Result<RankingsResponse, FetchError> {
        let url = rankings_url(filters, self.viewer);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !resp.ok() {
            return Err(FetchError::Status(resp.status()));
        }

        resp.json::<RankingsResponse>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Fetch the job filter catalogue.
pub async fn fetch_jobs() -> Result<Vec<JobCategory>, FetchError> {
    let resp = gloo_net::http::Request::get("/api/rankings/jobs")
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }

    resp.json::<Vec<JobCategory>>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rankings_url_carries_filters_and_viewer() {
        let filters = RankingFilters {
            job: "thief".into(),
            search: "Dan".into(),
            page: 3,
        };
        assert_eq!(
            rankings_url(&filters, Some(42)),
            "/api/rankings?job=thief&page=3&search=Dan&viewer=42"
        );
        assert_eq!(
            rankings_url(&RankingFilters::default(), None),
            "/api/rankings?job=all&page=1"
        );
    }
}
