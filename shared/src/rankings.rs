use serde::{Deserialize, Serialize};

use crate::appearance::CharacterAppearance;

pub const ALL_JOBS: &str = "all";

/// Which slice of the leaderboard is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingFilters {
    pub job: String,
    pub search: String,
    pub page: u32,
}

impl Default for RankingFilters {
    fn default() -> Self {
        Self {
            job: ALL_JOBS.to_string(),
            search: String::new(),
            page: 1,
        }
    }
}

impl RankingFilters {
    pub fn merge(&self, patch: FilterPatch) -> Self {
        Self {
            job: patch.job.unwrap_or_else(|| self.job.clone()),
            search: patch.search.unwrap_or_else(|| self.search.clone()),
            page: patch.page.unwrap_or(self.page),
        }
    }

    pub fn is_all_jobs(&self) -> bool {
        self.job == ALL_JOBS
    }

    /// Query string understood by `GET /api/rankings`.
    pub fn to_query(&self) -> String {
        let mut query = format!("job={}&page={}", urlencoding::encode(&self.job), self.page);
        if !self.search.is_empty() {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(&self.search));
        }
        query
    }
}

/// Partial update applied with [`RankingFilters::merge`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub job: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: u64,
    pub rank: u32,
    pub name: String,
    pub level: u32,
    pub job: String,
    pub job_id: u32,
    #[serde(default)]
    pub guild: Option<String>,
    pub fame: i64,
    pub exp: u64,
    #[serde(default)]
    pub is_current_user: bool,
    #[serde(default)]
    pub appearance: CharacterAppearance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub start_item: u64,
    pub end_item: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl PaginationInfo {
    /// Pagination block for `total_items` split into pages of `page_size`.
    /// Out-of-range pages clamp to the last page.
    pub fn compute(requested_page: u32, page_size: u32, total_items: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(u64::from(page_size)).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        let current_page = requested_page.clamp(1, total_pages);

        let (start_item, end_item) = if total_items == 0 {
            (0, 0)
        } else {
            let start = u64::from(current_page - 1) * u64::from(page_size) + 1;
            let end = (u64::from(current_page) * u64::from(page_size)).min(total_items);
            (start, end)
        };

        Self {
            current_page,
            total_pages,
            total_items,
            start_item,
            end_item,
            has_prev_page: current_page > 1,
            has_next_page: current_page < total_pages,
        }
    }

    /// Zero-based row offset of the current page.
    pub fn offset(&self) -> usize {
        self.start_item.saturating_sub(1) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub rankings: Vec<RankingEntry>,
    pub pagination: PaginationInfo,
    #[serde(default)]
    pub user_ranking: Option<RankingEntry>,
}
