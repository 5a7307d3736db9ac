use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::attachments::{AttachmentPolicy, AttachmentRejection};
use super::card::{review_controls, submission_card, submit_control, welcome_card};
use super::domain::{
    AttachmentDescriptor, ChannelId, MessageRef, SubmissionFields, UserProfile,
    MAX_ARTIST_NAME_LEN, MAX_GENRE_LEN, MAX_SOCIALS_LEN, MAX_SONG_LINK_LEN, MAX_SONG_NAME_LEN,
};
use super::gateway::{ChatGateway, GatewayError};
use super::routing::ChannelDirectory;

/// Rejection raised before any submission state exists.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} must be {max} characters or fewer")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("{field} is required")]
    FieldMissing { field: &'static str },
    #[error(transparent)]
    Attachments(#[from] AttachmentRejection),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Where the submission card landed, if anywhere. `None` means no intake
/// channel is configured and the card was intentionally not posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub posted: Option<MessageRef>,
}

/// Validates a completed form and posts the submission card with enabled
/// review controls to the intake channel.
pub struct IntakeService<G> {
    gateway: Arc<G>,
    directory: ChannelDirectory,
    policy: AttachmentPolicy,
}

impl<G> IntakeService<G>
where
    G: ChatGateway,
{
    pub fn new(gateway: Arc<G>, directory: ChannelDirectory) -> Self {
        Self::with_policy(gateway, directory, AttachmentPolicy::default())
    }

    pub fn with_policy(
        gateway: Arc<G>,
        directory: ChannelDirectory,
        policy: AttachmentPolicy,
    ) -> Self {
        Self {
            gateway,
            directory,
            policy,
        }
    }

    /// Accept a completed form. Validation happens before any side effect so
    /// a rejected batch never produces a partial submission.
    pub async fn submit(
        &self,
        fields: SubmissionFields,
        attachments: Vec<AttachmentDescriptor>,
        submitter: &UserProfile,
        submitted_at: DateTime<Utc>,
    ) -> Result<IntakeReceipt, IntakeError> {
        validate_fields(&fields)?;
        self.policy.validate(&attachments)?;

        let Some(channel) = self.directory.intake else {
            info!(submitter = submitter.id.0, "no intake channel configured, submission not posted");
            return Ok(IntakeReceipt { posted: None });
        };

        let card = submission_card(&fields, submitter, &attachments, submitted_at);
        let location = self
            .gateway
            .post_card(channel, None, card, review_controls(false))
            .await?;

        info!(
            submitter = submitter.id.0,
            channel = channel.0,
            message = location.message.0,
            "submission card posted"
        );

        Ok(IntakeReceipt {
            posted: Some(location),
        })
    }

    /// Post the standing welcome card with the persistent submit button.
    pub async fn post_welcome(
        &self,
        channel: ChannelId,
        guild_icon: Option<&str>,
        posted_at: DateTime<Utc>,
    ) -> Result<MessageRef, GatewayError> {
        let card = welcome_card(guild_icon, posted_at);
        self.gateway
            .post_card(channel, None, card, submit_control())
            .await
    }
}

fn validate_fields(fields: &SubmissionFields) -> Result<(), IntakeError> {
    check_field("Artist Name", &fields.artist_name, MAX_ARTIST_NAME_LEN)?;
    check_field("Song Name", &fields.song_name, MAX_SONG_NAME_LEN)?;
    check_field("Song Link", &fields.song_link, MAX_SONG_LINK_LEN)?;
    check_field("Genre", &fields.genre, MAX_GENRE_LEN)?;
    check_field("Social Media", &fields.socials, MAX_SOCIALS_LEN)?;
    Ok(())
}

fn check_field(name: &'static str, value: &str, max: usize) -> Result<(), IntakeError> {
    if value.trim().is_empty() {
        return Err(IntakeError::FieldMissing { field: name });
    }
    if value.chars().count() > max {
        return Err(IntakeError::FieldTooLong { field: name, max });
    }
    Ok(())
}
