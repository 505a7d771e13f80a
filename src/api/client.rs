use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::error::ApiError;
use super::types::{
    ActionResult, CreateGameResponse, Game, GameAction, GameConfig, GameId, GameList, Health,
    Stats,
};
use super::GameApi;

/// Path under the server origin where the game API is mounted.
pub const API_BASE_PATH: &str = "/api";

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the werewolf game server.
#[derive(Clone)]
pub struct GameApiClient {
    http: Client,
    base_url: Url,
}

impl GameApiClient {
    /// `api_base` is the full API root, e.g. `http://127.0.0.1:8000/api`.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(api_base).with_context(|| format!("Invalid API base URL: {}", api_base))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", api_base);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GameApiClient { http, base_url })
    }

    /// Build a client for a server origin, mounting the API at [`API_BASE_PATH`].
    pub fn for_server(server_url: &str, timeout: Duration) -> Result<Self> {
        let api_base = format!("{}{}", server_url.trim_end_matches('/'), API_BASE_PATH);
        Self::new(&api_base, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidRequest(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and turn transport failures and non-2xx answers into
    /// logged [`ApiError`]s.
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let mut req = self.http.request(method, url.clone());
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await.map_err(|source| {
            log_error(ApiError::Transport {
                url: url.to_string(),
                source,
            })
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(log_error(ApiError::Status {
                url: url.to_string(),
                status,
                body,
            }));
        }

        Ok(resp)
    }

    /// Like [`request`](Self::request), then unwrap the JSON body.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let resp = self.request(method, segments, body).await?;
        let url = resp.url().to_string();
        resp.json::<T>()
            .await
            .map_err(|source| log_error(ApiError::Decode { url, source }))
    }
}

fn log_error(err: ApiError) -> ApiError {
    error!("API error: {}", err);
    err
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| log_error(ApiError::InvalidRequest(e.to_string())))
}

#[async_trait]
impl GameApi for GameApiClient {
    async fn get_health(&self) -> Result<Health, ApiError> {
        self.request_json(Method::GET, &["health"], None).await
    }

    async fn get_stats(&self) -> Result<Stats, ApiError> {
        self.request_json(Method::GET, &["stats"], None).await
    }

    async fn create_game(&self, config: &GameConfig) -> Result<CreateGameResponse, ApiError> {
        config
            .validate()
            .map_err(|reason| log_error(ApiError::InvalidRequest(reason)))?;
        let body = to_body(config)?;
        self.request_json(Method::POST, &["games"], Some(body)).await
    }

    async fn get_games(&self) -> Result<GameList, ApiError> {
        self.request_json(Method::GET, &["games"], None).await
    }

    async fn get_game(&self, id: &GameId) -> Result<Game, ApiError> {
        self.request_json(Method::GET, &["games", id.as_str()], None)
            .await
    }

    async fn start_game(&self, id: &GameId) -> Result<ActionResult, ApiError> {
        self.request_json(Method::POST, &["games", id.as_str(), "start"], None)
            .await
    }

    async fn next_round(&self, id: &GameId) -> Result<ActionResult, ApiError> {
        self.request_json(Method::POST, &["games", id.as_str(), "next-round"], None)
            .await
    }

    async fn game_action(
        &self,
        id: &GameId,
        action: &GameAction,
    ) -> Result<ActionResult, ApiError> {
        let body = to_body(action)?;
        self.request_json(Method::POST, &["games", id.as_str(), "action"], Some(body))
            .await
    }

    async fn delete_game(&self, id: &GameId) -> Result<(), ApiError> {
        self.request(Method::DELETE, &["games", id.as_str()], None)
            .await
            .map(|_| ())
    }
}
