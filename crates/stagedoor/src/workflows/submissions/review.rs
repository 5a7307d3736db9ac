use std::sync::Arc;

use tracing::{info, warn};

use super::card::{
    destination_card, parse_card, posted_toggle, review_controls, review_status_field, Card,
};
use super::domain::{
    ChannelId, MessageId, MessageRef, ReviewAction, ReviewStatus, UserId, UserProfile,
};
use super::gateway::{ChatGateway, GatewayError};
use super::notify::Notifier;
use super::routing::{ChannelDirectory, ChannelRouter, DestinationKind};

/// Rejection of a review request before any effect is applied.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("this submission has already been reviewed")]
    AlreadyReviewed,
    #[error("a rejection reason is required")]
    MissingReason,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// What happened to the submitter notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    /// The footer carried no recoverable identity; no delivery was attempted.
    UnknownSubmitter,
    Failed(String),
}

/// Outcome of one review action, from which the boundary composes the
/// reviewer-facing reply. A populated `routing_failure` means the status was
/// recorded but the card stayed where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReport {
    pub status: ReviewStatus,
    pub relocated: bool,
    pub routing_failure: Option<String>,
    pub notification: NotificationOutcome,
}

/// Token carried through the deny reason form so the modal submission can
/// recover the originating card without closure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenyTicket {
    pub card: MessageRef,
    pub reviewer: UserId,
}

const DENY_TICKET_PREFIX: &str = "deny_reason";

impl DenyTicket {
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            DENY_TICKET_PREFIX, self.card.channel.0, self.card.message.0, self.reviewer.0
        )
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.split(':');
        if parts.next() != Some(DENY_TICKET_PREFIX) {
            return None;
        }
        let channel = parts.next()?.parse::<u64>().ok()?;
        let message = parts.next()?.parse::<u64>().ok()?;
        let reviewer = parts.next()?.parse::<u64>().ok()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            card: MessageRef {
                channel: ChannelId(channel),
                message: MessageId(message),
            },
            reviewer: UserId(reviewer),
        })
    }
}

/// The Review State Machine. Owns a submission's transition from pending to
/// a terminal disposition: status recording, control disabling, relocation,
/// and submitter notification.
pub struct ReviewService<G> {
    gateway: Arc<G>,
    router: ChannelRouter<G>,
    notifier: Notifier<G>,
}

impl<G> ReviewService<G>
where
    G: ChatGateway,
{
    pub fn new(gateway: Arc<G>, directory: ChannelDirectory) -> Self {
        let router = ChannelRouter::new(gateway.clone(), directory);
        let notifier = Notifier::new(gateway.clone());
        Self {
            gateway,
            router,
            notifier,
        }
    }

    pub async fn accept(
        &self,
        card: &Card,
        location: MessageRef,
        reviewer: &UserProfile,
    ) -> Result<ReviewReport, ReviewError> {
        self.apply(card, location, reviewer, ReviewAction::Accept)
            .await
    }

    pub async fn deny(
        &self,
        card: &Card,
        location: MessageRef,
        reviewer: &UserProfile,
        reason: &str,
    ) -> Result<ReviewReport, ReviewError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReviewError::MissingReason);
        }

        self.apply(
            card,
            location,
            reviewer,
            ReviewAction::Deny {
                reason: reason.to_string(),
            },
        )
        .await
    }

    pub async fn hold(
        &self,
        card: &Card,
        location: MessageRef,
        reviewer: &UserProfile,
    ) -> Result<ReviewReport, ReviewError> {
        self.apply(card, location, reviewer, ReviewAction::Hold)
            .await
    }

    /// The single transition function. A second terminal action on the same
    /// card is rejected by the parse check before any effect is applied.
    async fn apply(
        &self,
        card: &Card,
        location: MessageRef,
        reviewer: &UserProfile,
        action: ReviewAction,
    ) -> Result<ReviewReport, ReviewError> {
        let parsed = parse_card(card);
        if parsed.is_reviewed() {
            return Err(ReviewError::AlreadyReviewed);
        }

        let status = action.status();

        // Record the disposition and disable every control in one update so
        // the first terminal transition is what later parses observe.
        let mut updated = card.clone();
        updated
            .fields
            .push(review_status_field(&action, &reviewer.display_name));
        self.gateway
            .update_card(location, updated, review_controls(true))
            .await?;

        info!(
            channel = location.channel.0,
            message = location.message.0,
            reviewer = reviewer.id.0,
            status = status.label(),
            "submission reviewed"
        );

        let mut relocated = false;
        let mut routing_failure = None;

        if let Some(kind) = DestinationKind::for_status(status) {
            if self.router.destination(kind).is_some() {
                let summary = destination_card(card, &parsed, status, action.reason());
                let controls = if status == ReviewStatus::Accepted {
                    posted_toggle()
                } else {
                    Vec::new()
                };

                match self.router.route(kind, summary, controls).await {
                    Ok(posted) => match self.router.retract(location).await {
                        Ok(()) => {
                            relocated = true;
                            info!(
                                destination = posted.channel.0,
                                message = posted.message.0,
                                "submission relocated"
                            );
                        }
                        Err(err) => {
                            warn!(error = %err, "relocated card posted but original not removed");
                            routing_failure = Some(err.to_string());
                        }
                    },
                    Err(err) => {
                        warn!(error = %err, "submission could not be relocated");
                        routing_failure = Some(err.to_string());
                    }
                }
            }
        }

        let notification = match parsed.submitter_id {
            Some(submitter) => {
                match self
                    .notifier
                    .notify(submitter, status, action.reason(), &parsed.fields)
                    .await
                {
                    Ok(()) => NotificationOutcome::Delivered,
                    Err(err) => {
                        warn!(submitter = submitter.0, error = %err, "submitter notification failed");
                        NotificationOutcome::Failed(err.to_string())
                    }
                }
            }
            None => {
                warn!(
                    channel = location.channel.0,
                    message = location.message.0,
                    "submission footer carries no submitter id"
                );
                NotificationOutcome::UnknownSubmitter
            }
        };

        Ok(ReviewReport {
            status,
            relocated,
            routing_failure,
            notification,
        })
    }
}
