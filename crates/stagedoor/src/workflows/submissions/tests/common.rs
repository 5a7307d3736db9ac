use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::submissions::card::{submission_card, Card, Control};
use crate::workflows::submissions::domain::{
    AttachmentDescriptor, ChannelId, MessageId, MessageRef, StickerId, SubmissionFields, UserId,
    UserProfile,
};
use crate::workflows::submissions::gateway::{ChatGateway, GatewayError};
use crate::workflows::submissions::intake::IntakeService;
use crate::workflows::submissions::review::ReviewService;
use crate::workflows::submissions::routing::ChannelDirectory;

pub(super) const INTAKE_CHANNEL: ChannelId = ChannelId(10);
pub(super) const ACCEPTED_CHANNEL: ChannelId = ChannelId(20);
pub(super) const DENIED_CHANNEL: ChannelId = ChannelId(30);
pub(super) const HELD_CHANNEL: ChannelId = ChannelId(40);

pub(super) fn fields() -> SubmissionFields {
    SubmissionFields {
        artist_name: "Nova".to_string(),
        song_name: "Skyline".to_string(),
        song_link: "http://x".to_string(),
        genre: "Synth".to_string(),
        socials: "@nova".to_string(),
    }
}

pub(super) fn submitter() -> UserProfile {
    UserProfile {
        id: UserId(4242),
        display_name: "Nova".to_string(),
        avatar_url: None,
    }
}

pub(super) fn reviewer() -> UserProfile {
    UserProfile {
        id: UserId(99),
        display_name: "Rue".to_string(),
        avatar_url: None,
    }
}

pub(super) fn directory() -> ChannelDirectory {
    ChannelDirectory {
        intake: Some(INTAKE_CHANNEL),
        accepted: Some(ACCEPTED_CHANNEL),
        denied: Some(DENIED_CHANNEL),
        held: Some(HELD_CHANNEL),
    }
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn pending_card() -> Card {
    submission_card(&fields(), &submitter(), &[], submitted_at())
}

pub(super) fn attachment(filename: &str, size_bytes: u64) -> AttachmentDescriptor {
    AttachmentDescriptor {
        filename: filename.to_string(),
        size_bytes,
        url: format!("https://cdn.example/{filename}"),
    }
}

#[derive(Debug, Clone)]
pub(super) struct PostedMessage {
    pub(super) location: MessageRef,
    pub(super) content: Option<String>,
    pub(super) card: Card,
    pub(super) controls: Vec<Control>,
}

#[derive(Debug, Clone)]
pub(super) struct UpdatedMessage {
    pub(super) location: MessageRef,
    pub(super) card: Card,
    pub(super) controls: Vec<Control>,
}

#[derive(Debug, Clone)]
pub(super) struct DirectMessage {
    pub(super) user: UserId,
    pub(super) card: Card,
}

/// Offline gateway recording every delivery, with failure knobs for the
/// error-path scenarios.
#[derive(Default)]
pub(super) struct RecordingGateway {
    next_message_id: Mutex<u64>,
    posts: Mutex<Vec<PostedMessage>>,
    updates: Mutex<Vec<UpdatedMessage>>,
    deletes: Mutex<Vec<MessageRef>>,
    directs: Mutex<Vec<DirectMessage>>,
    stickers: Mutex<Vec<(MessageRef, StickerId)>>,
    fail_posts_to: Mutex<Option<ChannelId>>,
    refuse_directs: Mutex<bool>,
}

impl RecordingGateway {
    pub(super) fn fail_posts_to(&self, channel: ChannelId) {
        *self.fail_posts_to.lock().expect("gateway mutex poisoned") = Some(channel);
    }

    pub(super) fn refuse_direct_messages(&self) {
        *self.refuse_directs.lock().expect("gateway mutex poisoned") = true;
    }

    pub(super) fn posts(&self) -> Vec<PostedMessage> {
        self.posts.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn updates(&self) -> Vec<UpdatedMessage> {
        self.updates.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn deletes(&self) -> Vec<MessageRef> {
        self.deletes.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn directs(&self) -> Vec<DirectMessage> {
        self.directs.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn stickers(&self) -> Vec<(MessageRef, StickerId)> {
        self.stickers.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn post_card(
        &self,
        channel: ChannelId,
        content: Option<String>,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<MessageRef, GatewayError> {
        if *self.fail_posts_to.lock().expect("gateway mutex poisoned") == Some(channel) {
            return Err(GatewayError::Transport(
                "destination channel rejected the post".to_string(),
            ));
        }

        let mut next = self.next_message_id.lock().expect("gateway mutex poisoned");
        *next += 1;
        let location = MessageRef {
            channel,
            message: MessageId(*next),
        };

        self.posts
            .lock()
            .expect("gateway mutex poisoned")
            .push(PostedMessage {
                location,
                content,
                card,
                controls,
            });

        Ok(location)
    }

    async fn update_card(
        &self,
        location: MessageRef,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<(), GatewayError> {
        self.updates
            .lock()
            .expect("gateway mutex poisoned")
            .push(UpdatedMessage {
                location,
                card,
                controls,
            });
        Ok(())
    }

    async fn delete_message(&self, location: MessageRef) -> Result<(), GatewayError> {
        self.deletes
            .lock()
            .expect("gateway mutex poisoned")
            .push(location);
        Ok(())
    }

    async fn send_direct(&self, user: UserId, card: Card) -> Result<(), GatewayError> {
        if *self.refuse_directs.lock().expect("gateway mutex poisoned") {
            return Err(GatewayError::Forbidden);
        }

        self.directs
            .lock()
            .expect("gateway mutex poisoned")
            .push(DirectMessage { user, card });
        Ok(())
    }

    async fn send_sticker_reply(
        &self,
        to: MessageRef,
        sticker: StickerId,
    ) -> Result<(), GatewayError> {
        self.stickers
            .lock()
            .expect("gateway mutex poisoned")
            .push((to, sticker));
        Ok(())
    }
}

pub(super) fn build_review() -> (ReviewService<RecordingGateway>, Arc<RecordingGateway>) {
    build_review_with(directory())
}

pub(super) fn build_review_with(
    directory: ChannelDirectory,
) -> (ReviewService<RecordingGateway>, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::default());
    let service = ReviewService::new(gateway.clone(), directory);
    (service, gateway)
}

pub(super) fn build_intake() -> (IntakeService<RecordingGateway>, Arc<RecordingGateway>) {
    build_intake_with(directory())
}

pub(super) fn build_intake_with(
    directory: ChannelDirectory,
) -> (IntakeService<RecordingGateway>, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::default());
    let service = IntakeService::new(gateway.clone(), directory);
    (service, gateway)
}

/// A pending card posted through the recording gateway, as a reviewer would
/// encounter it.
pub(super) async fn posted_pending_card(
    gateway: &RecordingGateway,
) -> (Card, MessageRef) {
    let card = pending_card();
    let location = gateway
        .post_card(
            INTAKE_CHANNEL,
            None,
            card.clone(),
            crate::workflows::submissions::card::review_controls(false),
        )
        .await
        .expect("post succeeds");
    (card, location)
}
