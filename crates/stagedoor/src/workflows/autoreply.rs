use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use super::submissions::domain::{MessageRef, StickerId};
use super::submissions::gateway::{ChatGateway, GatewayError};

pub const DEFAULT_KEYWORD: &str = "bwaa";
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Keyword sticker reply with a process-wide cooldown.
///
/// The cooldown timestamp resets on process start and is mutated only by the
/// message handler; no other component reads it.
pub struct AutoReply {
    keyword: String,
    sticker: StickerId,
    cooldown: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl AutoReply {
    pub fn new(keyword: impl Into<String>, sticker: StickerId, cooldown: Duration) -> Self {
        Self {
            keyword: keyword.into(),
            sticker,
            cooldown,
            last_fired: Mutex::new(None),
        }
    }

    pub fn with_defaults(sticker: StickerId) -> Self {
        Self::new(DEFAULT_KEYWORD, sticker, DEFAULT_COOLDOWN)
    }

    /// Decide whether the reply fires for this message, recording the firing
    /// time when it does.
    pub fn should_fire(&self, content: &str, now: Instant) -> bool {
        if !content.contains(&self.keyword) {
            return false;
        }

        let mut last = self.last_fired.lock().expect("cooldown mutex poisoned");
        let ready = match *last {
            Some(fired_at) => now.duration_since(fired_at) >= self.cooldown,
            None => true,
        };
        if ready {
            *last = Some(now);
        }
        ready
    }

    /// Run the reply against a live message. Delivery failures are logged
    /// and reported as "did not reply"; they never propagate.
    pub async fn handle<G>(&self, gateway: &G, message: MessageRef, content: &str) -> bool
    where
        G: ChatGateway,
    {
        if !self.should_fire(content, Instant::now()) {
            return false;
        }

        match gateway.send_sticker_reply(message, self.sticker).await {
            Ok(()) => true,
            Err(GatewayError::Forbidden) => {
                warn!(message = message.message.0, "not allowed to reply with sticker");
                false
            }
            Err(err) => {
                warn!(message = message.message.0, error = %err, "sticker reply failed");
                false
            }
        }
    }
}
