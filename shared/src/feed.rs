use std::future::Future;

use crate::rankings::{PaginationInfo, RankingEntry, RankingFilters, RankingsResponse};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Decode(String),
}

/// Anything that can answer a rankings query.
pub trait RankingsSource {
    fn fetch(
        &self,
        filters: &RankingFilters,
    ) -> impl Future<Output = Result<RankingsResponse, FetchError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Last accepted rankings page plus the status of the newest request.
#[derive(Debug, Clone, Default)]
pub struct RankingsFeed {
    rankings: Vec<RankingEntry>,
    pagination: Option<PaginationInfo>,
    user_ranking: Option<RankingEntry>,
    status: LoadStatus,
    latest: Option<FetchTicket>,
    next_ticket: u64,
    requested: Option<RankingFilters>,
}

impl RankingsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rankings(&self) -> &[RankingEntry] {
        &self.rankings
    }

    pub fn pagination(&self) -> Option<&PaginationInfo> {
        self.pagination.as_ref()
    }

    pub fn user_ranking(&self) -> Option<&RankingEntry> {
        self.user_ranking.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Filters of the newest request, accepted or not.
    pub fn requested(&self) -> Option<&RankingFilters> {
        self.requested.as_ref()
    }

    /// Start a request; any earlier ticket becomes stale.
    pub fn begin(&mut self, filters: &RankingFilters) -> FetchTicket {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.latest = Some(ticket);
        self.requested = Some(filters.clone());
        self.status = LoadStatus::Loading;
        ticket
    }

    /// Apply a result. Returns `false` when a newer request superseded `ticket`.
    pub fn settle(
        &mut self,
        ticket: FetchTicket,
        result: Result<RankingsResponse, FetchError>,
    ) -> bool {
        if self.latest != Some(ticket) {
            return false;
        }
        match result {
            Ok(response) => {
                self.rankings = response.rankings;
                self.pagination = Some(response.pagination);
                self.user_ranking = response.user_ranking;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch `filters` from `source` and apply the result.
    pub async fn refresh(
        &mut self,
        source: &impl RankingsSource,
        filters: &RankingFilters,
    ) -> bool {
        let ticket = self.begin(filters);
        let result = source.fetch(filters).await;
        self.settle(ticket, result)
    }
}
