use tracing::{info, warn};

use crate::config::roster_refresh_interval;
use crate::roster::{CharacterRecord, load_roster};
use crate::state::AppState;

/// Load the roster before the listener binds. A missing file leaves an empty board.
pub async fn load_initial(state: &AppState) {
    match load_roster(&state.roster_path).await {
        Ok(characters) => {
            let count = characters.len();
            let version = state.replace_roster(characters).await;
            state.observability.record_roster_reload();
            info!(count, version, path = %state.roster_path.display(), "loaded roster");
        }
        Err(e) => {
            state.observability.record_roster_reload_failure();
            warn!(error = %e, path = %state.roster_path.display(), "starting with empty roster");
        }
    }
}

pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(roster_refresh_interval());
    // First tick fires immediately; load_initial already covered it.
    interval.tick().await;

    loop {
        interval.tick().await;
        reload(&state).await;
    }
}

async fn reload(state: &AppState) -> bool {
    let characters = match load_roster(&state.roster_path).await {
        Ok(characters) => characters,
        Err(e) => {
            state.observability.record_roster_reload_failure();
            warn!(error = %e, "failed to reload roster; keeping previous one");
            return false;
        }
    };

    if !roster_changed(state, &characters).await {
        return false;
    }

    let count = characters.len();
    let version = state.replace_roster(characters).await;
    state.observability.record_roster_reload();
    info!(count, version, "roster changed, page cache cleared");
    true
}

async fn roster_changed(state: &AppState, characters: &[CharacterRecord]) -> bool {
    let snapshot = state.roster.read().await;
    !snapshot.roster.same_characters(characters)
}
