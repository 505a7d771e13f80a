pub mod client;
pub mod error;
pub mod types;

pub use client::GameApiClient;
pub use error::ApiError;
pub use types::{
    ActionResult, CreateGameResponse, Game, GameAction, GameConfig, GameId, GameList, Health,
    Stats,
};

use async_trait::async_trait;

/// The game server's REST surface, one method per endpoint.
///
/// The store only talks to this trait, so it can run against the HTTP client
/// or an in-memory double.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// GET /health
    async fn get_health(&self) -> Result<Health, ApiError>;

    /// GET /stats
    async fn get_stats(&self) -> Result<Stats, ApiError>;

    /// POST /games
    async fn create_game(&self, config: &GameConfig) -> Result<CreateGameResponse, ApiError>;

    /// GET /games
    async fn get_games(&self) -> Result<GameList, ApiError>;

    /// GET /games/:id
    async fn get_game(&self, id: &GameId) -> Result<Game, ApiError>;

    /// POST /games/:id/start
    async fn start_game(&self, id: &GameId) -> Result<ActionResult, ApiError>;

    /// POST /games/:id/next-round
    async fn next_round(&self, id: &GameId) -> Result<ActionResult, ApiError>;

    /// POST /games/:id/action
    async fn game_action(&self, id: &GameId, action: &GameAction)
        -> Result<ActionResult, ApiError>;

    /// DELETE /games/:id
    async fn delete_game(&self, id: &GameId) -> Result<(), ApiError>;
}
