//! Live-stream watcher: polls the streaming platform and announces the
//! offline-to-live edge in a configured channel.

mod helix;

pub use helix::HelixSource;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::submissions::card::Card;
use super::submissions::domain::{ChannelId, MessageRef};
use super::submissions::gateway::{ChatGateway, GatewayError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

const LIVE_CARD_COLOR: u32 = 0x9b59b6;

/// Snapshot of a currently live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub title: String,
    pub game: Option<String>,
    pub viewers: Option<u64>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StreamWatchError {
    #[error("stream credentials were rejected")]
    Unauthorized,
    #[error("stream api error: {0}")]
    Api(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Source of the live/offline signal. The REST implementation lives in
/// [`HelixSource`]; tests script their own.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn live_stream(&self) -> Result<Option<StreamInfo>, StreamWatchError>;
}

/// Holds the edge state between polls. Only the offline-to-live edge posts;
/// repeated live polls are quiescent and going offline re-arms the edge.
pub struct StreamWatcher<S, G> {
    source: S,
    gateway: Arc<G>,
    channel: ChannelId,
    username: String,
    poll_interval: Duration,
    live: bool,
}

impl<S, G> StreamWatcher<S, G>
where
    S: StreamSource,
    G: ChatGateway,
{
    pub fn new(source: S, gateway: Arc<G>, channel: ChannelId, username: impl Into<String>) -> Self {
        Self {
            source,
            gateway,
            channel,
            username: username.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            live: false,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// One poll of the source, returning the announcement location when the
    /// offline-to-live edge fired.
    pub async fn poll_once(&mut self) -> Result<Option<MessageRef>, StreamWatchError> {
        match self.source.live_stream().await? {
            Some(stream) => {
                if self.live {
                    return Ok(None);
                }
                self.live = true;

                info!(username = %self.username, title = %stream.title, "stream went live");
                let content = format!(
                    "Hey everyone, @here! **{}** just went live!",
                    self.username
                );
                let posted = self
                    .gateway
                    .post_card(self.channel, Some(content), live_card(&self.username, &stream), Vec::new())
                    .await?;
                Ok(Some(posted))
            }
            None => {
                if self.live {
                    info!(username = %self.username, "stream went offline");
                }
                self.live = false;
                Ok(None)
            }
        }
    }

    /// Poll on the configured interval until the process exits. Failures are
    /// logged and the loop keeps going.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = self.poll_once().await {
                warn!(error = %err, "stream status poll failed");
            }
        }
    }
}

/// The announcement card for a live stream.
fn live_card(username: &str, stream: &StreamInfo) -> Card {
    let stream_url = format!("https://twitch.tv/{username}");

    let mut card = Card::new(format!("🔴 LIVE: {}", stream.title), LIVE_CARD_COLOR);
    card.url = Some(stream_url.clone());
    card.author_name = Some(format!("{username} is now streaming!"));
    card.author_url = Some(stream_url);

    card.add_field(
        "Game",
        stream.game.clone().unwrap_or_else(|| "Not specified".to_string()),
        true,
    );
    card.add_field(
        "Viewers",
        stream
            .viewers
            .map(|count| count.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        true,
    );

    if let Some(thumbnail) = &stream.thumbnail_url {
        let sized = thumbnail.replace("{width}", "1280").replace("{height}", "720");
        card.image_url = Some(format!("{sized}?t={}", Utc::now().timestamp()));
    }

    card
}
