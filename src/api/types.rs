//! Request and response bodies for the game server's REST API.
//!
//! Every endpoint gets its own type so responses are validated once, at the
//! boundary, instead of being poked at field by field downstream.  Fields the
//! server may omit carry `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque server-assigned game identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        GameId(s.to_string())
    }
}

impl From<String> for GameId {
    fn from(s: String) -> Self {
        GameId(s)
    }
}

/// Lifecycle status reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Created,
    Running,
    Finished,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Localized role name as rendered by the server
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_alive")]
    pub is_alive: bool,
}

fn default_alive() -> bool {
    true
}

/// A game as returned by `GET /games` (summaries) and `GET /games/:id` (detail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub status: GameStatus,
    #[serde(default)]
    pub round: u32,
    /// "waiting" | "discussion" | "voting" | "ended"
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub num_players: Option<u32>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub players: Vec<Player>,
    /// Human-readable event log, oldest first
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

impl Game {
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }
}

/// Body of `POST /games`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: u32,
    pub llm_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            num_players: 6,
            llm_provider: "modelscope".to_string(),
            model_name: None,
        }
    }
}

impl GameConfig {
    /// Reject configurations the server could never turn into a game.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_players == 0 {
            return Err("num_players must be at least 1".to_string());
        }
        if self.llm_provider.trim().is_empty() {
            return Err("llm_provider must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /games`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameList {
    /// Server order is preserved; an absent field means no games.
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub active_games: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Generic acknowledgement returned by start / next-round / action.
///
/// Endpoint-specific fields (round results and the like) are kept verbatim in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A player-facing game command, e.g. `{"type": "next-round"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl GameAction {
    pub const NEXT_ROUND: &'static str = "next-round";

    pub fn new(kind: impl Into<String>) -> Self {
        GameAction {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    pub fn next_round() -> Self {
        Self::new(Self::NEXT_ROUND)
    }

    /// Attach the fields of a JSON object as the action's payload.
    /// Non-object values are ignored, and `type` is never overridden.
    pub fn with_payload(mut self, payload: Value) -> Self {
        if let Value::Object(map) = payload {
            for (k, v) in map {
                if k != "type" {
                    self.payload.insert(k, v);
                }
            }
        }
        self
    }

    pub fn is_next_round(&self) -> bool {
        self.kind == Self::NEXT_ROUND
    }
}
