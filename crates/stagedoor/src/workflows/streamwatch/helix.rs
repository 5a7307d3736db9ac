use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::StreamWatchConfig;

use super::{StreamInfo, StreamSource, StreamWatchError};

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

/// Helix-style REST source using the client-credentials token flow. An
/// expired token is refreshed once per poll before giving up.
pub struct HelixSource {
    http: Client,
    client_id: String,
    client_secret: String,
    username: String,
    token_url: String,
    streams_url: String,
    token: Mutex<Option<String>>,
}

impl HelixSource {
    pub fn new(config: &StreamWatchConfig) -> Self {
        Self::with_endpoints(config, TOKEN_URL, STREAMS_URL)
    }

    pub fn with_endpoints(
        config: &StreamWatchConfig,
        token_url: impl Into<String>,
        streams_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            token_url: token_url.into(),
            streams_url: streams_url.into(),
            token: Mutex::new(None),
        }
    }

    async fn fetch_token(&self) -> Result<String, StreamWatchError> {
        let response = self
            .http
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(api_error)?;

        if !response.status().is_success() {
            return Err(StreamWatchError::Unauthorized);
        }

        let payload: Value = response.json().await.map_err(api_error)?;
        payload
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StreamWatchError::Api("token response missing access_token".to_string()))
    }

    async fn query_streams(&self, token: &str) -> Result<Response, StreamWatchError> {
        self.http
            .get(&self.streams_url)
            .query(&[("user_login", self.username.as_str())])
            .header("Client-ID", &self.client_id)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(api_error)
    }
}

#[async_trait]
impl StreamSource for HelixSource {
    async fn live_stream(&self) -> Result<Option<StreamInfo>, StreamWatchError> {
        let mut cached = self.token.lock().await;
        let token = match cached.as_ref() {
            Some(token) => token.clone(),
            None => {
                let fresh = self.fetch_token().await?;
                *cached = Some(fresh.clone());
                fresh
            }
        };

        let mut response = self.query_streams(&token).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("stream access token expired, refreshing");
            let fresh = self.fetch_token().await?;
            *cached = Some(fresh.clone());
            response = self.query_streams(&fresh).await?;
        }
        drop(cached);

        if !response.status().is_success() {
            return Err(StreamWatchError::Api(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let payload: Value = response.json().await.map_err(api_error)?;
        let Some(stream) = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|streams| streams.first())
        else {
            return Ok(None);
        };

        debug!(username = %self.username, "stream is live");
        Ok(Some(StreamInfo {
            title: stream
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("No Title")
                .to_string(),
            game: stream
                .get("game_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            viewers: stream.get("viewer_count").and_then(Value::as_u64),
            thumbnail_url: stream
                .get("thumbnail_url")
                .and_then(Value::as_str)
                .map(str::to_string),
        }))
    }
}

fn api_error(err: reqwest::Error) -> StreamWatchError {
    StreamWatchError::Api(err.to_string())
}
