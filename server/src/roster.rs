use std::cmp::Ordering;
use std::path::Path;

use rankboard_shared::jobs::{job_matches, job_name};
use rankboard_shared::{
    CharacterAppearance, PaginationInfo, RankingEntry, RankingFilters, RankingsResponse,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: u64,
    pub account_id: u64,
    pub name: String,
    pub level: u32,
    pub job_id: u32,
    #[serde(default)]
    pub exp: u64,
    #[serde(default)]
    pub fame: i64,
    #[serde(default)]
    pub guild: Option<String>,
    #[serde(default)]
    pub appearance: CharacterAppearance,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    characters: Vec<CharacterRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse roster file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub async fn load_roster(path: &Path) -> Result<Vec<CharacterRecord>, RosterError> {
    let raw = tokio::fs::read(path).await?;
    let file: RosterFile = serde_json::from_slice(&raw)?;
    Ok(file.characters)
}

/// Characters kept in leaderboard order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<CharacterRecord>,
}

impl Roster {
    pub fn new(mut characters: Vec<CharacterRecord>) -> Self {
        characters.sort_by(leaderboard_order);
        Self { characters }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Whether `characters` would produce this exact roster.
    pub fn same_characters(&self, characters: &[CharacterRecord]) -> bool {
        if characters.len() != self.characters.len() {
            return false;
        }
        let mut sorted = characters.to_vec();
        sorted.sort_by(leaderboard_order);
        sorted == self.characters
    }

    /// Answer one rankings request. `filters.job` must already be validated.
    pub fn query(
        &self,
        filters: &RankingFilters,
        viewer: Option<u64>,
        page_size: u32,
    ) -> RankingsResponse {
        let needle = filters.search.to_lowercase();
        let matching: Vec<&CharacterRecord> = self
            .characters
            .iter()
            .filter(|c| job_matches(&filters.job, c.job_id))
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect();

        let pagination = PaginationInfo::compute(filters.page, page_size, matching.len() as u64);
        let rankings = matching
            .iter()
            .enumerate()
            .skip(pagination.offset())
            .take(page_size as usize)
            .map(|(idx, character)| to_entry(character, idx, viewer))
            .collect();

        let user_ranking = viewer.and_then(|account| {
            self.characters
                .iter()
                .enumerate()
                .find(|(_, c)| c.account_id == account)
                .map(|(idx, character)| to_entry(character, idx, viewer))
        });

        RankingsResponse {
            rankings,
            pagination,
            user_ranking,
        }
    }
}

fn to_entry(character: &CharacterRecord, position: usize, viewer: Option<u64>) -> RankingEntry {
    RankingEntry {
        id: character.id,
        rank: u32::try_from(position + 1).unwrap_or(u32::MAX),
        name: character.name.clone(),
        level: character.level,
        job: job_name(character.job_id).to_string(),
        job_id: character.job_id,
        guild: character.guild.clone().filter(|g| !g.trim().is_empty()),
        fame: character.fame,
        exp: character.exp,
        is_current_user: viewer == Some(character.account_id),
        appearance: character.appearance.clone(),
    }
}

fn leaderboard_order(a: &CharacterRecord, b: &CharacterRecord) -> Ordering {
    b.level
        .cmp(&a.level)
        .then_with(|| b.exp.cmp(&a.exp))
        .then_with(|| b.fame.cmp(&a.fame))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
