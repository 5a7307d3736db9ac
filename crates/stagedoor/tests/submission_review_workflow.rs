//! End-to-end scenarios for the submission intake and review workflow,
//! driven through the public service facade so the card is the only state
//! carried between steps.

mod common {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use stagedoor::workflows::submissions::card::{Card, Control};
    use stagedoor::workflows::submissions::domain::{
        AttachmentDescriptor, ChannelId, MessageId, MessageRef, StickerId, SubmissionFields,
        UserId, UserProfile,
    };
    use stagedoor::workflows::submissions::gateway::{ChatGateway, GatewayError};
    use stagedoor::workflows::submissions::routing::ChannelDirectory;
    use stagedoor::workflows::submissions::{IntakeService, ReviewService};

    pub(super) const INTAKE: ChannelId = ChannelId(10);
    pub(super) const ACCEPTED: ChannelId = ChannelId(20);
    pub(super) const DENIED: ChannelId = ChannelId(30);

    #[derive(Debug, Clone)]
    pub(super) struct Delivery {
        pub(super) location: MessageRef,
        pub(super) card: Card,
        pub(super) controls: Vec<Control>,
    }

    #[derive(Default)]
    pub(super) struct MemoryGateway {
        next_id: Mutex<u64>,
        pub(super) posts: Mutex<Vec<Delivery>>,
        pub(super) updates: Mutex<Vec<Delivery>>,
        pub(super) deletes: Mutex<Vec<MessageRef>>,
        pub(super) directs: Mutex<Vec<(UserId, Card)>>,
    }

    #[async_trait]
    impl ChatGateway for MemoryGateway {
        async fn post_card(
            &self,
            channel: ChannelId,
            _content: Option<String>,
            card: Card,
            controls: Vec<Control>,
        ) -> Result<MessageRef, GatewayError> {
            let mut next = self.next_id.lock().expect("lock");
            *next += 1;
            let location = MessageRef {
                channel,
                message: MessageId(*next),
            };
            self.posts.lock().expect("lock").push(Delivery {
                location,
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
            self.updates.lock().expect("lock").push(Delivery {
                location,
                card,
                controls,
            });
            Ok(())
        }

        async fn delete_message(&self, location: MessageRef) -> Result<(), GatewayError> {
            self.deletes.lock().expect("lock").push(location);
            Ok(())
        }

        async fn send_direct(&self, user: UserId, card: Card) -> Result<(), GatewayError> {
            self.directs.lock().expect("lock").push((user, card));
            Ok(())
        }

        async fn send_sticker_reply(
            &self,
            _to: MessageRef,
            _sticker: StickerId,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    pub(super) fn directory() -> ChannelDirectory {
        ChannelDirectory {
            intake: Some(INTAKE),
            accepted: Some(ACCEPTED),
            denied: Some(DENIED),
            held: None,
        }
    }

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

    pub(super) fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn build() -> (
        IntakeService<MemoryGateway>,
        ReviewService<MemoryGateway>,
        Arc<MemoryGateway>,
    ) {
        let gateway = Arc::new(MemoryGateway::default());
        let intake = IntakeService::new(gateway.clone(), directory());
        let review = ReviewService::new(gateway.clone(), directory());
        (intake, review, gateway)
    }

    pub(super) fn attachmentless() -> Vec<AttachmentDescriptor> {
        Vec::new()
    }
}

mod accept_flow {
    use super::common::*;

    #[tokio::test]
    async fn intake_then_accept_relocates_and_notifies() {
        let (intake, review, gateway) = build();

        let receipt = intake
            .submit(fields(), attachmentless(), &submitter(), submitted_at())
            .await
            .expect("intake succeeds");
        let location = receipt.posted.expect("card posted");

        let posted = gateway.posts.lock().expect("lock")[0].clone();
        assert_eq!(posted.location.channel, INTAKE);

        let report = review
            .accept(&posted.card, location, &reviewer())
            .await
            .expect("accept succeeds");
        assert!(report.relocated);

        // The original was updated (status + disabled controls) before removal.
        let updates = gateway.updates.lock().expect("lock").clone();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].controls.iter().all(|control| control.disabled));

        let posts = gateway.posts.lock().expect("lock").clone();
        let summary = posts
            .iter()
            .find(|delivery| delivery.location.channel == ACCEPTED)
            .expect("accepted card posted");
        let values: Vec<&str> = summary
            .card
            .fields
            .iter()
            .map(|field| field.value.as_str())
            .collect();
        assert_eq!(values, vec!["Nova", "Skyline", "http://x", "Synth", "@nova"]);

        assert_eq!(
            gateway.deletes.lock().expect("lock").clone(),
            vec![location]
        );

        let directs = gateway.directs.lock().expect("lock").clone();
        assert_eq!(directs.len(), 1);
        assert_eq!(directs[0].1.title, "Your Submission Status: Accepted");
    }
}

mod deny_flow {
    use super::common::*;

    #[tokio::test]
    async fn deny_with_reason_reaches_card_and_submitter() {
        let (intake, review, gateway) = build();

        let receipt = intake
            .submit(fields(), attachmentless(), &submitter(), submitted_at())
            .await
            .expect("intake succeeds");
        let location = receipt.posted.expect("card posted");
        let posted = gateway.posts.lock().expect("lock")[0].clone();

        review
            .deny(&posted.card, location, &reviewer(), "Low audio quality")
            .await
            .expect("deny succeeds");

        let posts = gateway.posts.lock().expect("lock").clone();
        let summary = posts
            .iter()
            .find(|delivery| delivery.location.channel == DENIED)
            .expect("denied card posted");
        let reason = summary
            .card
            .fields
            .iter()
            .find(|field| field.name == "Rejection Reason")
            .expect("reason field present");
        assert_eq!(reason.value, "Low audio quality");

        let directs = gateway.directs.lock().expect("lock").clone();
        assert_eq!(
            directs[0].1.description.as_deref(),
            Some("**Reason for rejection:**\nLow audio quality")
        );
    }
}

mod restart_recovery {
    use super::common::*;
    use stagedoor::workflows::submissions::card::{parse_card, Card};
    use stagedoor::workflows::submissions::domain::UserId;

    #[tokio::test]
    async fn a_card_rehydrated_from_storage_still_reviews() {
        let (intake, review, gateway) = build();

        intake
            .submit(fields(), attachmentless(), &submitter(), submitted_at())
            .await
            .expect("intake succeeds");
        let posted = gateway.posts.lock().expect("lock")[0].clone();

        // Simulate a process restart: the only surviving state is the card
        // as the platform stored it.
        let stored = serde_json::to_string(&posted.card).expect("card serializes");
        let rehydrated: Card = serde_json::from_str(&stored).expect("card deserializes");

        let parsed = parse_card(&rehydrated);
        assert_eq!(parsed.submitter_id, Some(UserId(4242)));

        let report = review
            .accept(&rehydrated, posted.location, &reviewer())
            .await
            .expect("accept succeeds after rehydration");
        assert!(report.relocated);
    }
}
