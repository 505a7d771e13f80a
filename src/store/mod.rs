//! Observable game store.
//!
//! [`GameStore`] sequences API calls and mirrors their results into a
//! [`StoreState`] published over a `watch` channel.  Front ends subscribe to
//! the channel and re-render on every change.
//!
//! Every action follows the same shape: mark itself in flight and clear
//! `error`, call the API, mutate state only on success, and on failure write
//! the action's fixed localized message to `error`.  Read-only refreshes
//! (`fetch_games`, `fetch_stats`) swallow their failures; everything else hands
//! a [`StoreError`] back to the caller.

pub mod messages;
pub mod state;

pub use messages::{Locale, StoreAction};
pub use state::StoreState;

use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::api::{
    ActionResult, ApiError, Game, GameAction, GameApi, GameConfig, GameId, Health, Stats,
};

/// A store action failed.  `message` is what was written to `error`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub action: StoreAction,
    pub message: String,
    #[source]
    pub source: ApiError,
}

/// Result of [`GameStore::create_game`] when no HTTP error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(GameId),
    /// The server reported success but sent no `game_id`
    CreatedWithoutId,
    Declined { reason: Option<String> },
}

impl StoreError {
    pub fn into_source(self) -> ApiError {
        self.source
    }
}

/// Session-scoped store: create one per UI session and pass it to handlers.
pub struct GameStore {
    api: Arc<dyn GameApi>,
    locale: Locale,
    state: watch::Sender<StoreState>,
    in_flight: AtomicUsize,
}

/// Keeps `loading` raised while alive.  Dropping it (on any exit path,
/// including a cancelled future) lowers `loading` once no other action is
/// in flight.
struct LoadingGuard<'a> {
    store: &'a GameStore,
}

impl<'a> LoadingGuard<'a> {
    fn begin(store: &'a GameStore) -> Self {
        // Counter changes happen inside send_modify so they are ordered with
        // the `loading` writes.
        store.state.send_modify(|s| {
            store.in_flight.fetch_add(1, Ordering::SeqCst);
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let store = self.store;
        store.state.send_modify(|s| {
            let remaining = store.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            s.loading = remaining > 0;
        });
    }
}

impl GameStore {
    pub fn new(api: Arc<dyn GameApi>, locale: Locale) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        GameStore {
            api,
            locale,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Record a failure in `error` and wrap it for the caller.
    fn fail(&self, action: StoreAction, source: ApiError) -> StoreError {
        let message = self.locale.failure_message(action).to_string();
        error!("{} failed: {}", action, source);
        self.state.send_modify(|s| s.error = Some(message.clone()));
        StoreError {
            action,
            message,
            source,
        }
    }

    // ── Read-only refreshes ──────────────────────────────────────────────────

    /// Replace `games` with the server's list.  Failures are logged and shown
    /// in `error` but not returned.
    pub async fn fetch_games(&self) {
        let _loading = LoadingGuard::begin(self);
        match self.api.get_games().await {
            Ok(list) => {
                let count = list.games.len();
                self.state.send_modify(|s| {
                    s.games = list.games;
                    s.games_synced_at = Some(Utc::now());
                });
                info!("Fetched {} game(s)", count);
            }
            Err(e) => {
                let _ = self.fail(StoreAction::FetchGames, e);
            }
        }
    }

    /// Replace `stats`.  Failures are only logged: no `error`, no `loading`.
    /// Returns the new stats, or `None` when the request failed.
    pub async fn fetch_stats(&self) -> Option<Stats> {
        match self.api.get_stats().await {
            Ok(stats) => {
                self.state.send_modify(|s| s.stats = stats);
                Some(stats)
            }
            Err(e) => {
                warn!("Failed to fetch stats: {}", e);
                None
            }
        }
    }

    /// Refresh the game list and stats concurrently.  Returns the stats when
    /// that half succeeded; list failures land in `error` as usual.
    pub async fn refresh(&self) -> Option<Stats> {
        let ((), stats) =
            futures_util::future::join(self.fetch_games(), self.fetch_stats()).await;
        stats
    }

    /// Ping the server.  Touches no state.
    pub async fn check_health(&self) -> Result<Health, ApiError> {
        self.api.get_health().await
    }

    // ── Mutating actions ─────────────────────────────────────────────────────

    /// Create a game and refresh the list.  A server that answers without an
    /// HTTP error but with `success: false` yields [`CreateOutcome::Declined`].
    pub async fn create_game(&self, config: &GameConfig) -> Result<CreateOutcome, StoreError> {
        let _loading = LoadingGuard::begin(self);
        let resp = self
            .api
            .create_game(config)
            .await
            .map_err(|e| self.fail(StoreAction::CreateGame, e))?;

        if !resp.success {
            warn!(
                "Server declined to create game: {}",
                resp.message.as_deref().unwrap_or("no reason given")
            );
            return Ok(CreateOutcome::Declined {
                reason: resp.message,
            });
        }

        match &resp.game_id {
            Some(id) => info!("Created game {}", id),
            None => warn!("Server created a game but did not report its id"),
        }
        self.fetch_games().await;
        Ok(match resp.game_id {
            Some(id) => CreateOutcome::Created(id),
            None => CreateOutcome::CreatedWithoutId,
        })
    }

    /// Fetch a game's detail into `current_game`.
    pub async fn load_game(&self, id: &GameId) -> Result<Game, StoreError> {
        let _loading = LoadingGuard::begin(self);
        let game = self
            .api
            .get_game(id)
            .await
            .map_err(|e| self.fail(StoreAction::LoadGame, e))?;
        let current = game.clone();
        self.state.send_modify(|s| s.current_game = Some(current));
        Ok(game)
    }

    /// Start a game; on success reload it into `current_game`.  The raw start
    /// result is returned either way.
    pub async fn start_game(&self, id: &GameId) -> Result<ActionResult, StoreError> {
        let _loading = LoadingGuard::begin(self);
        let result = self
            .api
            .start_game(id)
            .await
            .map_err(|e| self.fail(StoreAction::StartGame, e))?;

        if result.success {
            info!("Started game {}", id);
            if let Err(e) = self.load_game(id).await {
                return Err(self.fail(StoreAction::StartGame, e.into_source()));
            }
        }
        Ok(result)
    }

    /// Delete a game and refresh the list.
    pub async fn delete_game(&self, id: &GameId) -> Result<(), StoreError> {
        let _loading = LoadingGuard::begin(self);
        self.api
            .delete_game(id)
            .await
            .map_err(|e| self.fail(StoreAction::DeleteGame, e))?;
        info!("Deleted game {}", id);
        self.fetch_games().await;
        Ok(())
    }

    /// Run a game action.  `next-round` goes to its dedicated endpoint;
    /// everything else to the generic action endpoint.
    pub async fn game_action(
        &self,
        id: &GameId,
        action: &GameAction,
    ) -> Result<ActionResult, StoreError> {
        let _loading = LoadingGuard::begin(self);
        let outcome = if action.is_next_round() {
            self.api.next_round(id).await
        } else {
            self.api.game_action(id, action).await
        };
        outcome.map_err(|e| self.fail(StoreAction::GameAction, e))
    }

    pub fn clear_current_game(&self) {
        self.state.send_modify(|s| s.current_game = None);
    }
}
