//! What the rankings panel should show for a given controller/feed state.

use crate::jobs::category_label;
use crate::rankings::{PaginationInfo, RankingEntry, RankingFilters};

pub const MAX_PAGE_BUTTONS: u32 = 5;
pub const STALE_PREVIEW_ROWS: usize = 10;
pub const STAR_LEVEL: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLabel {
    Updating,
    Loading,
}

impl OverlayLabel {
    pub fn text(self) -> &'static str {
        match self {
            Self::Updating => "Updating...",
            Self::Loading => "Loading rankings...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    /// Spinner over the table; `stale_rows` faded underneath when non-zero.
    Overlay {
        label: OverlayLabel,
        stale_rows: usize,
    },
    Failed(String),
    Empty(String),
    Rows,
}

pub fn table_state(
    transitioning: bool,
    loading: bool,
    error: Option<&str>,
    filters: &RankingFilters,
    row_count: usize,
) -> TableState {
    if transitioning || loading {
        let stale_rows = if transitioning && !loading {
            row_count.min(STALE_PREVIEW_ROWS)
        } else {
            0
        };
        let label = if transitioning {
            OverlayLabel::Updating
        } else {
            OverlayLabel::Loading
        };
        return TableState::Overlay { label, stale_rows };
    }
    if let Some(message) = error {
        return TableState::Failed(message.to_string());
    }
    if row_count == 0 {
        return TableState::Empty(empty_state_message(filters));
    }
    TableState::Rows
}

/// Page buttons around `current`, at most [`MAX_PAGE_BUTTONS`].
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let start = current.saturating_sub(2).max(1);
    (0..MAX_PAGE_BUTTONS.min(total))
        .filter_map(|offset| start.checked_add(offset))
        .filter(|page| *page <= total)
        .collect()
}

pub fn empty_state_message(filters: &RankingFilters) -> String {
    if !filters.search.is_empty() {
        format!("No players found matching \"{}\"", filters.search)
    } else if !filters.is_all_jobs() {
        let job = if filters.job == "archer" {
            "Bowman"
        } else {
            filters.job.as_str()
        };
        format!("No {job} players found")
    } else {
        "Rankings will appear here once characters are created".to_string()
    }
}

pub fn ranking_title(filters: &RankingFilters) -> String {
    if filters.is_all_jobs() {
        "Top Players".to_string()
    } else {
        format!("{} Rankings", category_label(&filters.job))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsBar {
    pub champion: String,
    pub your_rank: String,
    pub total_players: String,
    pub max_level: String,
}

pub fn stats_bar(
    rankings: &[RankingEntry],
    pagination: Option<&PaginationInfo>,
    user_ranking: Option<&RankingEntry>,
) -> StatsBar {
    let first = rankings.first();
    let total = pagination
        .map(|p| p.total_items)
        .filter(|total| *total > 0)
        .unwrap_or(rankings.len() as u64);
    StatsBar {
        champion: first.map_or_else(|| "No data".to_string(), |e| e.name.clone()),
        your_rank: user_ranking.map_or_else(|| "Not ranked".to_string(), |e| format!("#{}", e.rank)),
        total_players: format_thousands(total),
        max_level: first.map_or_else(|| "N/A".to_string(), |e| e.level.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    TopTen,
    Standard,
}

impl RankTier {
    pub fn of(rank: u32) -> Self {
        match rank {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            4..=10 => Self::TopTen,
            _ => Self::Standard,
        }
    }

    pub fn has_crown(self) -> bool {
        matches!(self, Self::Gold | Self::Silver | Self::Bronze)
    }

    /// Row tint for the top ten.
    pub fn background(self) -> Option<&'static str> {
        match self {
            Self::Gold => Some("rgba(245, 197, 66, 0.16)"),
            Self::Silver => Some("rgba(192, 196, 204, 0.14)"),
            Self::Bronze => Some("rgba(205, 127, 50, 0.14)"),
            Self::TopTen => Some("rgba(122, 120, 133, 0.10)"),
            Self::Standard => None,
        }
    }
}

pub fn has_level_star(level: u32) -> bool {
    level >= STAR_LEVEL
}

/// Whether to show the viewer's best character below the table.
pub fn show_user_highlight(
    filters: &RankingFilters,
    rankings: &[RankingEntry],
    user_ranking: Option<&RankingEntry>,
) -> bool {
    user_ranking.is_some()
        && !rankings.iter().any(|entry| entry.is_current_user)
        && filters.is_all_jobs()
        && filters.search.is_empty()
        && filters.page == 1
}

pub fn show_pagination(pagination: Option<&PaginationInfo>) -> bool {
    pagination.is_some_and(|p| p.total_pages > 1)
}

pub fn pagination_summary(pagination: &PaginationInfo) -> String {
    format!(
        "Showing {}-{} of {} players",
        pagination.start_item, pagination.end_item, pagination.total_items
    )
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_signed_thousands(value: i64) -> String {
    let formatted = format_thousands(value.unsigned_abs());
    if value < 0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}
