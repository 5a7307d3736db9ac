use std::sync::Arc;

use crate::config::ChannelConfig;

use super::card::{Card, Control};
use super::domain::{ChannelId, MessageRef, ReviewStatus};
use super::gateway::{ChatGateway, GatewayError};

/// Logical audience for a terminally reviewed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Accepted,
    Denied,
    Held,
}

impl DestinationKind {
    pub const fn label(self) -> &'static str {
        match self {
            DestinationKind::Accepted => "accepted",
            DestinationKind::Denied => "denied",
            DestinationKind::Held => "held",
        }
    }

    pub const fn for_status(status: ReviewStatus) -> Option<Self> {
        match status {
            ReviewStatus::Accepted => Some(DestinationKind::Accepted),
            ReviewStatus::Denied => Some(DestinationKind::Denied),
            ReviewStatus::Held => Some(DestinationKind::Held),
            ReviewStatus::Pending => None,
        }
    }
}

/// Configuration-driven map of logical destinations to concrete channels.
/// An unconfigured destination is a valid state, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelDirectory {
    pub intake: Option<ChannelId>,
    pub accepted: Option<ChannelId>,
    pub denied: Option<ChannelId>,
    pub held: Option<ChannelId>,
}

impl ChannelDirectory {
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self {
            intake: config.intake.map(ChannelId),
            accepted: config.accepted.map(ChannelId),
            denied: config.denied.map(ChannelId),
            held: config.held.map(ChannelId),
        }
    }

    pub fn resolve(&self, kind: DestinationKind) -> Option<ChannelId> {
        match kind {
            DestinationKind::Accepted => self.accepted,
            DestinationKind::Denied => self.denied,
            DestinationKind::Held => self.held,
        }
    }
}

/// Failure to relocate a card. Reported to the caller, never retried.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("no channel is configured for {0} submissions")]
    Unconfigured(&'static str),
    #[error("posting to the destination failed: {0}")]
    Post(#[source] GatewayError),
    #[error("removing the original card failed: {0}")]
    Retract(#[source] GatewayError),
}

/// Performs relocation: post the summary card to the destination, then
/// remove the original. The original is never deleted unless the post landed.
pub struct ChannelRouter<G> {
    gateway: Arc<G>,
    directory: ChannelDirectory,
}

impl<G> ChannelRouter<G>
where
    G: ChatGateway,
{
    pub fn new(gateway: Arc<G>, directory: ChannelDirectory) -> Self {
        Self { gateway, directory }
    }

    pub fn directory(&self) -> &ChannelDirectory {
        &self.directory
    }

    pub fn destination(&self, kind: DestinationKind) -> Option<ChannelId> {
        self.directory.resolve(kind)
    }

    pub async fn route(
        &self,
        kind: DestinationKind,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<MessageRef, RoutingError> {
        let channel = self
            .directory
            .resolve(kind)
            .ok_or(RoutingError::Unconfigured(kind.label()))?;

        self.gateway
            .post_card(channel, None, card, controls)
            .await
            .map_err(RoutingError::Post)
    }

    pub async fn retract(&self, original: MessageRef) -> Result<(), RoutingError> {
        self.gateway
            .delete_message(original)
            .await
            .map_err(RoutingError::Retract)
    }
}
