//! HTTP boundary for the platform's interaction callbacks.
//!
//! Every user-triggerable failure is converted here into an ephemeral reply
//! to the initiating user; unexpected causes are logged, never shown.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use crate::workflows::autoreply::AutoReply;

use super::card::{
    posted_done, Card, ACCEPT_BUTTON_ID, DENY_BUTTON_ID, HOLD_BUTTON_ID, MARK_POSTED_BUTTON_ID,
    SUBMIT_BUTTON_ID,
};
use super::domain::{
    AttachmentDescriptor, ChannelId, MessageId, MessageRef, ReviewStatus, SubmissionFields, UserId,
    UserProfile, MAX_ARTIST_NAME_LEN, MAX_GENRE_LEN, MAX_SOCIALS_LEN, MAX_SONG_LINK_LEN,
    MAX_SONG_NAME_LEN,
};
use super::gateway::ChatGateway;
use super::intake::{IntakeError, IntakeService};
use super::review::{DenyTicket, NotificationOutcome, ReviewError, ReviewReport, ReviewService};
use super::routing::ChannelDirectory;

pub const SUCCESS_MESSAGE: &str = "✅ Your submission has been received!";
pub const ERROR_MESSAGE: &str = "❌ An error occurred while submitting your form.";
pub const OWNER_ONLY_MESSAGE: &str =
    "❌ You don't have permission to use this command. Only the bot owner can use this command.";

pub const SUBMISSION_FORM_ID: &str = "submission_form";

/// Everything the interaction handlers need, shared behind the router state.
pub struct SubmissionApp<G> {
    pub intake: IntakeService<G>,
    pub review: ReviewService<G>,
    pub gateway: Arc<G>,
    pub owner: Option<UserId>,
    pub auto_reply: Option<AutoReply>,
}

impl<G> SubmissionApp<G>
where
    G: ChatGateway,
{
    pub fn new(
        gateway: Arc<G>,
        directory: ChannelDirectory,
        owner: Option<UserId>,
        auto_reply: Option<AutoReply>,
    ) -> Self {
        Self {
            intake: IntakeService::new(gateway.clone(), directory),
            review: ReviewService::new(gateway.clone(), directory),
            gateway,
            owner,
            auto_reply,
        }
    }
}

/// One interaction callback, as delivered by the platform adapter.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionEvent {
    Command(CommandEvent),
    Button(ButtonEvent),
    Modal(ModalEvent),
}

#[derive(Debug, Deserialize)]
pub struct CommandEvent {
    pub name: String,
    pub user: UserProfile,
    /// Channel the command was invoked from.
    pub channel: Option<u64>,
    /// Optional channel argument overriding the current channel.
    #[serde(default)]
    pub target_channel: Option<u64>,
    #[serde(default)]
    pub guild_icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ButtonEvent {
    pub custom_id: String,
    pub channel: u64,
    pub message: u64,
    pub user: UserProfile,
    /// The message's card as last displayed, included by the platform for
    /// component interactions.
    #[serde(default)]
    pub card: Option<Card>,
}

#[derive(Debug, Deserialize)]
pub struct ModalEvent {
    pub custom_id: String,
    pub user: UserProfile,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,
    /// For the deny-reason form: the originating card as last displayed.
    #[serde(default)]
    pub card: Option<Card>,
}

/// A message-created event, consumed by the keyword auto-reply.
#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    pub channel: u64,
    pub message: u64,
    pub content: String,
}

/// What the platform adapter should do in response to an interaction.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionReply {
    Message { content: String, ephemeral: bool },
    Modal { modal: ModalSpec },
}

impl InteractionReply {
    fn ephemeral(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Definition of a modal form the platform should open.
#[derive(Debug, Serialize)]
pub struct ModalSpec {
    pub custom_id: String,
    pub title: String,
    pub inputs: Vec<ModalInput>,
}

#[derive(Debug, Serialize)]
pub struct ModalInput {
    pub custom_id: String,
    pub label: String,
    pub placeholder: String,
    pub paragraph: bool,
    pub required: bool,
    pub max_length: usize,
}

impl ModalInput {
    fn new(
        custom_id: &str,
        label: &str,
        placeholder: &str,
        paragraph: bool,
        max_length: usize,
    ) -> Self {
        Self {
            custom_id: custom_id.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            paragraph,
            required: true,
            max_length,
        }
    }
}

/// The intake form, matching the original submission modal field for field.
pub fn submission_form_modal() -> ModalSpec {
    ModalSpec {
        custom_id: SUBMISSION_FORM_ID.to_string(),
        title: "🎵 Music Submission Form".to_string(),
        inputs: vec![
            ModalInput::new(
                "artist_name",
                "Artist Name",
                "Enter your name...",
                false,
                MAX_ARTIST_NAME_LEN,
            ),
            ModalInput::new(
                "song_name",
                "Song Name",
                "Enter your song title...",
                false,
                MAX_SONG_NAME_LEN,
            ),
            ModalInput::new(
                "song_link",
                "Song Link",
                "Enter the link to your song (YouTube, SoundCloud, etc.)...",
                false,
                MAX_SONG_LINK_LEN,
            ),
            ModalInput::new(
                "genre",
                "Genre",
                "Enter the genre(s) of your song...",
                true,
                MAX_GENRE_LEN,
            ),
            ModalInput::new(
                "socials",
                "Social Media",
                "Enter your social media links (Instagram, Twitter, etc.)...",
                true,
                MAX_SOCIALS_LEN,
            ),
        ],
    }
}

/// The second step of the deny sub-protocol: a reason form carrying the
/// originating card reference in its custom id.
pub fn deny_reason_modal(ticket: DenyTicket) -> ModalSpec {
    ModalSpec {
        custom_id: ticket.encode(),
        title: "Rejection Reason".to_string(),
        inputs: vec![ModalInput::new(
            "reason",
            "Reason",
            "Let the artist know why the track was not accepted...",
            true,
            500,
        )],
    }
}

/// Router exposing the interaction and message-event callbacks.
pub fn interaction_router<G>(app: Arc<SubmissionApp<G>>) -> Router
where
    G: ChatGateway + 'static,
{
    Router::new()
        .route("/interactions", post(interaction_handler::<G>))
        .route("/events/message", post(message_event_handler::<G>))
        .with_state(app)
}

pub(crate) async fn interaction_handler<G>(
    State(app): State<Arc<SubmissionApp<G>>>,
    Json(event): Json<InteractionEvent>,
) -> Json<InteractionReply>
where
    G: ChatGateway + 'static,
{
    let reply = match event {
        InteractionEvent::Command(command) => handle_command(&app, command).await,
        InteractionEvent::Button(button) => handle_button(&app, button).await,
        InteractionEvent::Modal(modal) => handle_modal(&app, modal).await,
    };

    Json(reply)
}

async fn handle_command<G>(app: &SubmissionApp<G>, command: CommandEvent) -> InteractionReply
where
    G: ChatGateway,
{
    if command.name != "send_submission" {
        return InteractionReply::ephemeral("Unknown command.");
    }

    if app.owner != Some(command.user.id) {
        return InteractionReply::ephemeral(OWNER_ONLY_MESSAGE);
    }

    let Some(channel) = command.target_channel.or(command.channel).map(ChannelId) else {
        return InteractionReply::ephemeral("❌ No channel available for the submission form.");
    };

    match app
        .intake
        .post_welcome(channel, command.guild_icon.as_deref(), Utc::now())
        .await
    {
        Ok(_) => {
            InteractionReply::ephemeral(format!("✅ Submission form sent to <#{}>!", channel.0))
        }
        Err(err) => {
            error!(channel = channel.0, error = %err, "failed to post the welcome card");
            InteractionReply::ephemeral("❌ An error occurred while sending the submission form.")
        }
    }
}

async fn handle_button<G>(app: &SubmissionApp<G>, button: ButtonEvent) -> InteractionReply
where
    G: ChatGateway,
{
    let location = MessageRef {
        channel: ChannelId(button.channel),
        message: MessageId(button.message),
    };

    match button.custom_id.as_str() {
        SUBMIT_BUTTON_ID => InteractionReply::Modal {
            modal: submission_form_modal(),
        },
        ACCEPT_BUTTON_ID | HOLD_BUTTON_ID => {
            let Some(card) = button.card else {
                return InteractionReply::ephemeral(
                    "❌ The submission card could not be read from this message.",
                );
            };

            let result = if button.custom_id == ACCEPT_BUTTON_ID {
                app.review.accept(&card, location, &button.user).await
            } else {
                app.review.hold(&card, location, &button.user).await
            };
            review_reply(result)
        }
        DENY_BUTTON_ID => InteractionReply::Modal {
            modal: deny_reason_modal(DenyTicket {
                card: location,
                reviewer: button.user.id,
            }),
        },
        MARK_POSTED_BUTTON_ID => {
            let Some(card) = button.card else {
                return InteractionReply::ephemeral(
                    "❌ The submission card could not be read from this message.",
                );
            };

            match app.gateway.update_card(location, card, posted_done()).await {
                Ok(()) => InteractionReply::ephemeral("✅ Marked as posted."),
                Err(err) => {
                    error!(error = %err, "failed to mark a card as posted");
                    InteractionReply::ephemeral("❌ Could not update the card.")
                }
            }
        }
        other => {
            error!(custom_id = other, "unrecognized control id");
            InteractionReply::ephemeral("Unknown control.")
        }
    }
}

async fn handle_modal<G>(app: &SubmissionApp<G>, modal: ModalEvent) -> InteractionReply
where
    G: ChatGateway,
{
    if modal.custom_id == SUBMISSION_FORM_ID {
        return handle_submission_form(app, modal).await;
    }

    if let Some(ticket) = DenyTicket::parse(&modal.custom_id) {
        return handle_deny_reason(app, ticket, modal).await;
    }

    error!(custom_id = %modal.custom_id, "unrecognized modal id");
    InteractionReply::ephemeral("Unknown form.")
}

async fn handle_submission_form<G>(app: &SubmissionApp<G>, modal: ModalEvent) -> InteractionReply
where
    G: ChatGateway,
{
    let value = |key: &str| modal.values.get(key).cloned().unwrap_or_default();
    let fields = SubmissionFields {
        artist_name: value("artist_name"),
        song_name: value("song_name"),
        song_link: value("song_link"),
        genre: value("genre"),
        socials: value("socials"),
    };

    match app
        .intake
        .submit(fields, modal.attachments, &modal.user, Utc::now())
        .await
    {
        Ok(_) => InteractionReply::ephemeral(SUCCESS_MESSAGE),
        Err(err @ (IntakeError::FieldTooLong { .. } | IntakeError::FieldMissing { .. })) => {
            InteractionReply::ephemeral(format!("❌ {err}"))
        }
        Err(IntakeError::Attachments(rejection)) => {
            InteractionReply::ephemeral(format!("❌ {rejection}"))
        }
        Err(IntakeError::Gateway(err)) => {
            error!(submitter = modal.user.id.0, error = %err, "form submission failed");
            InteractionReply::ephemeral(ERROR_MESSAGE)
        }
    }
}

async fn handle_deny_reason<G>(
    app: &SubmissionApp<G>,
    ticket: DenyTicket,
    modal: ModalEvent,
) -> InteractionReply
where
    G: ChatGateway,
{
    let Some(card) = modal.card else {
        return InteractionReply::ephemeral(
            "❌ The submission card could not be read from this message.",
        );
    };

    let reason = modal.values.get("reason").cloned().unwrap_or_default();
    let result = app
        .review
        .deny(&card, ticket.card, &modal.user, &reason)
        .await;
    review_reply(result)
}

fn review_reply(result: Result<ReviewReport, ReviewError>) -> InteractionReply {
    match result {
        Ok(report) => InteractionReply::ephemeral(compose_review_reply(&report)),
        Err(ReviewError::AlreadyReviewed) => {
            InteractionReply::ephemeral("⚠️ This submission has already been reviewed.")
        }
        Err(ReviewError::MissingReason) => {
            InteractionReply::ephemeral("❌ A rejection reason is required.")
        }
        Err(ReviewError::Gateway(err)) => {
            error!(error = %err, "review action failed");
            InteractionReply::ephemeral("❌ Something went wrong while processing the review.")
        }
    }
}

/// The ephemeral reviewer-facing summary of what the review did.
pub fn compose_review_reply(report: &ReviewReport) -> String {
    let mut lines = vec![match report.status {
        ReviewStatus::Accepted => "✅ Submission accepted.".to_string(),
        ReviewStatus::Denied => "❌ Submission denied.".to_string(),
        ReviewStatus::Held => "⏸️ Submission placed on hold.".to_string(),
        ReviewStatus::Pending => String::new(),
    }];

    if let Some(failure) = &report.routing_failure {
        lines.push(format!("⚠️ The card could not be relocated: {failure}"));
    }

    match &report.notification {
        NotificationOutcome::Delivered => {
            lines.push("The submitter has been notified.".to_string());
        }
        NotificationOutcome::UnknownSubmitter => {
            lines.push("⚠️ Could not determine the submitter to notify.".to_string());
        }
        NotificationOutcome::Failed(err) => {
            lines.push(format!("⚠️ The submitter could not be notified: {err}"));
        }
    }

    lines.retain(|line| !line.is_empty());
    lines.join("\n")
}

pub(crate) async fn message_event_handler<G>(
    State(app): State<Arc<SubmissionApp<G>>>,
    Json(event): Json<MessageEvent>,
) -> Json<Value>
where
    G: ChatGateway + 'static,
{
    let replied = match &app.auto_reply {
        Some(auto_reply) => {
            let location = MessageRef {
                channel: ChannelId(event.channel),
                message: MessageId(event.message),
            };
            auto_reply
                .handle(app.gateway.as_ref(), location, &event.content)
                .await
        }
        None => false,
    };

    Json(json!({ "replied": replied }))
}
