use async_trait::async_trait;

use super::card::{Card, Control};
use super::domain::{ChannelId, MessageRef, StickerId, UserId};

/// Delivery failures surfaced by a gateway implementation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("recipient or channel refused delivery")]
    Forbidden,
    #[error("message or channel no longer exists")]
    NotFound,
    #[error("platform transport error: {0}")]
    Transport(String),
}

/// The platform seam. Every network effect of the submission workflows goes
/// through this trait so the core stays testable offline.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Post a card (optionally with plain-text content above it and a row of
    /// controls below it) and return where it landed.
    async fn post_card(
        &self,
        channel: ChannelId,
        content: Option<String>,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<MessageRef, GatewayError>;

    /// Replace the card and controls of an existing message in place.
    async fn update_card(
        &self,
        location: MessageRef,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<(), GatewayError>;

    async fn delete_message(&self, location: MessageRef) -> Result<(), GatewayError>;

    /// Deliver a card privately to a user.
    async fn send_direct(&self, user: UserId, card: Card) -> Result<(), GatewayError>;

    /// Reply to a message with a sticker.
    async fn send_sticker_reply(
        &self,
        to: MessageRef,
        sticker: StickerId,
    ) -> Result<(), GatewayError>;
}
