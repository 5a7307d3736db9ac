use super::common::*;
use crate::workflows::submissions::card::{
    parse_card, MARK_POSTED_BUTTON_ID, REVIEW_STATUS_FIELD,
};
use crate::workflows::submissions::domain::{ReviewStatus, UserId};
use crate::workflows::submissions::review::{DenyTicket, NotificationOutcome, ReviewError};
use crate::workflows::submissions::routing::ChannelDirectory;

#[tokio::test]
async fn accept_relocates_the_card_and_notifies_the_submitter() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .accept(&card, location, &reviewer())
        .await
        .expect("accept succeeds");

    assert_eq!(report.status, ReviewStatus::Accepted);
    assert!(report.relocated);
    assert!(report.routing_failure.is_none());
    assert_eq!(report.notification, NotificationOutcome::Delivered);

    // Original card updated in place: status field appended, controls disabled.
    let updates = gateway.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].location, location);
    assert!(updates[0].card.is_reviewed());
    assert!(updates[0].controls.iter().all(|control| control.disabled));

    // Summary card landed in the accepted channel with the posted toggle.
    let posts = gateway.posts();
    let summary = posts
        .iter()
        .find(|post| post.location.channel == ACCEPTED_CHANNEL)
        .expect("summary posted");
    assert_eq!(summary.card.title, "Accepted Submission");
    let values: Vec<&str> = summary
        .card
        .fields
        .iter()
        .map(|field| field.value.as_str())
        .collect();
    assert_eq!(values, vec!["Nova", "Skyline", "http://x", "Synth", "@nova"]);
    assert_eq!(summary.controls.len(), 1);
    assert_eq!(summary.controls[0].custom_id, MARK_POSTED_BUTTON_ID);

    // Original deleted only after the repost landed.
    assert_eq!(gateway.deletes(), vec![location]);

    // Submitter received the outcome privately.
    let directs = gateway.directs();
    assert_eq!(directs.len(), 1);
    assert_eq!(directs[0].user, UserId(4242));
    assert_eq!(directs[0].card.title, "Your Submission Status: Accepted");
}

#[tokio::test]
async fn deny_requires_a_nonempty_reason() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    match service.deny(&card, location, &reviewer(), "   ").await {
        Err(ReviewError::MissingReason) => {}
        other => panic!("expected missing reason error, got {other:?}"),
    }

    assert!(gateway.updates().is_empty());
    assert!(gateway.deletes().is_empty());
    assert!(gateway.directs().is_empty());
}

#[tokio::test]
async fn deny_threads_the_reason_through_card_and_notification() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .deny(&card, location, &reviewer(), "Low audio quality")
        .await
        .expect("deny succeeds");
    assert_eq!(report.status, ReviewStatus::Denied);
    assert!(report.relocated);

    let status_field = gateway.updates()[0]
        .card
        .fields
        .iter()
        .find(|field| field.name == REVIEW_STATUS_FIELD)
        .cloned()
        .expect("status recorded");
    assert!(status_field.value.contains("Denied by Rue"));
    assert!(status_field.value.contains("Low audio quality"));

    let posts = gateway.posts();
    let summary = posts
        .iter()
        .find(|post| post.location.channel == DENIED_CHANNEL)
        .expect("summary posted");
    let reason = summary
        .card
        .fields
        .iter()
        .find(|field| field.name == "Rejection Reason")
        .expect("reason field present");
    assert_eq!(reason.value, "Low audio quality");

    let directs = gateway.directs();
    assert_eq!(directs.len(), 1);
    assert_eq!(directs[0].card.title, "Your Submission Status: Denied");
    assert_eq!(
        directs[0].card.description.as_deref(),
        Some("**Reason for rejection:**\nLow audio quality")
    );
}

#[tokio::test]
async fn hold_relocates_to_the_held_channel_without_a_toggle() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .hold(&card, location, &reviewer())
        .await
        .expect("hold succeeds");
    assert_eq!(report.status, ReviewStatus::Held);
    assert!(report.relocated);

    let posts = gateway.posts();
    let summary = posts
        .iter()
        .find(|post| post.location.channel == HELD_CHANNEL)
        .expect("summary posted");
    assert_eq!(summary.card.title, "Held Submission");
    assert!(summary.controls.is_empty());
}

#[tokio::test]
async fn a_second_transition_on_the_same_card_is_rejected() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    service
        .accept(&card, location, &reviewer())
        .await
        .expect("first review succeeds");

    // The card as the second reviewer would see it after the first update.
    let reviewed = gateway.updates()[0].card.clone();
    let updates_before = gateway.updates().len();
    let posts_before = gateway.posts().len();

    match service.hold(&reviewed, location, &reviewer()).await {
        Err(ReviewError::AlreadyReviewed) => {}
        other => panic!("expected already-reviewed rejection, got {other:?}"),
    }

    assert_eq!(gateway.updates().len(), updates_before);
    assert_eq!(gateway.posts().len(), posts_before);
}

#[tokio::test]
async fn unconfigured_destination_updates_the_card_in_place() {
    let (service, gateway) = build_review_with(ChannelDirectory {
        held: None,
        ..directory()
    });
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .hold(&card, location, &reviewer())
        .await
        .expect("hold succeeds");

    assert!(!report.relocated);
    assert!(report.routing_failure.is_none());

    // Status recorded where the card already lives; nothing moved or removed.
    let updates = gateway.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].location, location);
    assert!(updates[0].card.is_reviewed());
    assert!(gateway.deletes().is_empty());
    assert_eq!(gateway.posts().len(), 1, "only the original intake post");
}

#[tokio::test]
async fn failed_destination_post_leaves_the_original_in_place() {
    let (service, gateway) = build_review();
    gateway.fail_posts_to(ACCEPTED_CHANNEL);
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .accept(&card, location, &reviewer())
        .await
        .expect("review completes despite routing failure");

    assert!(!report.relocated);
    let failure = report.routing_failure.expect("failure surfaced");
    assert!(failure.contains("posting to the destination failed"));

    assert!(gateway.deletes().is_empty(), "original must not be removed");
    assert_eq!(gateway.updates().len(), 1, "status still recorded");
    assert_eq!(report.notification, NotificationOutcome::Delivered);
}

#[tokio::test]
async fn missing_footer_token_skips_notification_but_not_the_review() {
    let (service, gateway) = build_review();
    let (mut card, location) = posted_pending_card(&gateway).await;
    card.footer_text = Some("Submitted by Nova".to_string());

    let report = service
        .deny(&card, location, &reviewer(), "Low audio quality")
        .await
        .expect("deny succeeds");

    assert!(report.relocated);
    assert_eq!(report.notification, NotificationOutcome::UnknownSubmitter);
    assert!(gateway.directs().is_empty(), "no delivery attempted");
}

#[tokio::test]
async fn unreachable_submitter_is_reported_after_the_review_commits() {
    let (service, gateway) = build_review();
    gateway.refuse_direct_messages();
    let (card, location) = posted_pending_card(&gateway).await;

    let report = service
        .accept(&card, location, &reviewer())
        .await
        .expect("accept succeeds");

    assert!(report.relocated);
    match report.notification {
        NotificationOutcome::Failed(message) => {
            assert!(message.contains("unreachable"));
        }
        other => panic!("expected failed notification, got {other:?}"),
    }
}

#[test]
fn deny_ticket_round_trips_through_its_custom_id() {
    use crate::workflows::submissions::domain::{ChannelId, MessageId, MessageRef};

    let ticket = DenyTicket {
        card: MessageRef {
            channel: ChannelId(7),
            message: MessageId(12),
        },
        reviewer: UserId(99),
    };

    let encoded = ticket.encode();
    assert_eq!(encoded, "deny_reason:7:12:99");
    assert_eq!(DenyTicket::parse(&encoded), Some(ticket));
    assert_eq!(DenyTicket::parse("deny_reason:7:12"), None);
    assert_eq!(DenyTicket::parse("other:7:12:99"), None);
    assert_eq!(DenyTicket::parse("deny_reason:7:12:99:extra"), None);
}

#[tokio::test]
async fn review_status_survives_a_parse_of_the_updated_card() {
    let (service, gateway) = build_review();
    let (card, location) = posted_pending_card(&gateway).await;

    service
        .accept(&card, location, &reviewer())
        .await
        .expect("accept succeeds");

    let parsed = parse_card(&gateway.updates()[0].card);
    assert!(parsed.is_reviewed());
    assert_eq!(parsed.fields, fields());
    assert_eq!(parsed.submitter_id, Some(UserId(4242)));
}
