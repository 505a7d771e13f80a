use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::api::client::DEFAULT_TIMEOUT;
use crate::store::Locale;

/// Terminal front end for the AI werewolf game server
#[derive(Parser, Debug, Clone)]
#[command(name = "werewolf-client", version, about)]
pub struct Config {
    /// Game server origin; the API is served under `/api`
    #[arg(
        long,
        env = "WEREWOLF_SERVER_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub server_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "WEREWOLF_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Language for failure messages
    #[arg(long, env = "WEREWOLF_LOCALE", value_enum, default_value_t = Locale::ZhCn)]
    pub locale: Locale,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the server is up
    Health,
    /// Show game counters
    Stats,
    /// List games
    List {
        /// Only show running games
        #[arg(long)]
        active: bool,
    },
    /// Create a new game
    Create {
        /// Number of players to seat
        #[arg(long, default_value = "6")]
        players: u32,
        /// LLM provider that drives the AI players
        #[arg(long, default_value = "modelscope")]
        provider: String,
        /// Model name override for the provider
        #[arg(long)]
        model: Option<String>,
    },
    /// Show one game in detail
    Show { id: String },
    /// Start a created game
    Start { id: String },
    /// Advance a running game by one round
    NextRound { id: String },
    /// Send an arbitrary action to a game
    Action {
        id: String,
        /// Action type, e.g. "vote"
        kind: String,
        /// Extra action fields as a JSON object
        #[arg(long)]
        payload: Option<String>,
    },
    /// Delete a game
    Delete { id: String },
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            anyhow::bail!(
                "server_url must be an http(s) URL, got '{}'",
                self.server_url
            );
        }
        if let Command::Create { players, .. } = &self.command {
            if *players == 0 {
                anyhow::bail!("--players must be at least 1");
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
