use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

mod api;
mod config;
mod store;

use api::{ApiError, GameAction, GameApiClient, GameConfig, GameId};
use config::{Command, Config};
use store::{CreateOutcome, GameStore, StoreError};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = GameApiClient::for_server(&config.server_url, config.timeout())?;
    info!("Game API at {}", client.base_url());

    let store = GameStore::new(Arc::new(client), config.locale);

    // Trace every store update, the way a UI would re-render on them
    let mut updates = store.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let s = updates.borrow_and_update();
            debug!(
                games = s.games.len(),
                loading = s.loading,
                error = s.error.as_deref().unwrap_or(""),
                current = s.current_game.as_ref().map(|g| g.game_id.as_str()).unwrap_or(""),
                "store updated"
            );
        }
    });

    let result = run(&store, config.command).await;
    if let Err(e) = &result {
        report_failure(e);
    }
    result
}

/// The API error behind a failed command, if one caused it.
fn failing_request(err: &anyhow::Error) -> Option<&ApiError> {
    err.downcast_ref::<StoreError>()
        .map(|e| &e.source)
        .or_else(|| err.downcast_ref::<ApiError>())
}

/// Log what the server said when a command failed on an API call.
fn report_failure(err: &anyhow::Error) {
    let Some(api_err) = failing_request(err) else {
        return;
    };
    if api_err.is_timeout() {
        warn!("Request timed out; is the server reachable?");
    } else if let Some(status) = api_err.status() {
        error!("Server answered HTTP {}", status);
    }
}

async fn run(store: &GameStore, command: Command) -> Result<()> {
    match command {
        Command::Health => {
            let health = store.check_health().await?;
            if !health.is_healthy() {
                warn!("Server reports status '{}'", health.status);
            }
            print_json(&health)
        }
        Command::Stats => match store.fetch_stats().await {
            Some(stats) => print_json(&stats),
            None => anyhow::bail!("Failed to fetch stats"),
        },
        Command::List { active } => {
            let stats = store.refresh().await;
            let state = store.snapshot();
            if let Some(err) = &state.error {
                anyhow::bail!("{}", err);
            }
            if let Some(stats) = stats {
                info!(
                    "{} game(s) total, {} active",
                    stats.total_games, stats.active_games
                );
            }
            if active {
                print_json(&state.active_games())
            } else {
                print_json(&state.games)
            }
        }
        Command::Create {
            players,
            provider,
            model,
        } => {
            let cfg = GameConfig {
                num_players: players,
                llm_provider: provider,
                model_name: model,
            };
            match store.create_game(&cfg).await? {
                CreateOutcome::Created(id) => {
                    println!("{}", id);
                    Ok(())
                }
                CreateOutcome::CreatedWithoutId => {
                    warn!("Game created, but the server did not return its id");
                    Ok(())
                }
                CreateOutcome::Declined { reason } => anyhow::bail!(
                    "Server did not create the game: {}",
                    reason.as_deref().unwrap_or("no reason given")
                ),
            }
        }
        Command::Show { id } => {
            let game = store.load_game(&GameId::from(id)).await?;
            info!(
                "Game {}: round {}, phase '{}', {}/{} players alive",
                game.game_id,
                game.round,
                game.phase,
                game.alive_players().count(),
                game.players.len()
            );
            print_json(&game)
        }
        Command::Start { id } => {
            let id = GameId::from(id);
            let result = store.start_game(&id).await?;
            if !result.success {
                warn!("Server did not start game {}", id);
            }
            print_json(&result)
        }
        Command::NextRound { id } => {
            let result = store
                .game_action(&GameId::from(id), &GameAction::next_round())
                .await?;
            print_json(&result)
        }
        Command::Action { id, kind, payload } => {
            let mut action = GameAction::new(kind);
            if let Some(raw) = payload {
                let value: serde_json::Value =
                    serde_json::from_str(&raw).context("--payload must be valid JSON")?;
                if !value.is_object() {
                    anyhow::bail!("--payload must be a JSON object");
                }
                action = action.with_payload(value);
            }
            let result = store.game_action(&GameId::from(id), &action).await?;
            print_json(&result)
        }
        Command::Delete { id } => {
            let id = GameId::from(id);
            store.delete_game(&id).await?;
            let was_current = store
                .snapshot()
                .current_game
                .is_some_and(|g| g.game_id == id);
            if was_current {
                store.clear_current_game();
            }
            println!("deleted {}", id);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", out);
    Ok(())
}
