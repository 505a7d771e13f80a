use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{Game, Stats};

/// Everything the UI renders from.  Published as a whole on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    /// Game summaries in server order, replaced wholesale on each fetch
    pub games: Vec<Game>,
    /// Detail of the game last loaded by id, if any
    pub current_game: Option<Game>,
    /// True while at least one action is in flight
    pub loading: bool,
    /// Localized message from the most recent failing action
    pub error: Option<String>,
    pub stats: Stats,
    /// When `games` was last replaced from the server
    pub games_synced_at: Option<DateTime<Utc>>,
}

impl StoreState {
    /// Games whose status is `running`, in list order.
    pub fn active_games(&self) -> Vec<&Game> {
        self.games.iter().filter(|g| g.is_running()).collect()
    }

    pub fn has_current_game(&self) -> bool {
        self.current_game.is_some()
    }
}
