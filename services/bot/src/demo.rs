use crate::infra::{demo_directory, InMemoryChatGateway};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use stagedoor::error::AppError;
use stagedoor::workflows::submissions::domain::{
    AttachmentDescriptor, ChannelId, SubmissionFields, UserId, UserProfile,
};
use stagedoor::workflows::submissions::http::compose_review_reply;
use stagedoor::workflows::submissions::{IntakeService, ReviewService};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include a sample attachment batch in the intake portion
    #[arg(long)]
    pub(crate) with_attachments: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Stagedoor submission workflow demo (offline, in-memory gateway)");

    let gateway = Arc::new(InMemoryChatGateway::default());
    let directory = demo_directory();
    let intake = IntakeService::new(gateway.clone(), directory);
    let review = ReviewService::new(gateway.clone(), directory);

    let submitter = UserProfile {
        id: UserId(4242),
        display_name: "Nova".to_string(),
        avatar_url: None,
    };
    let reviewer = UserProfile {
        id: UserId(99),
        display_name: "Rue".to_string(),
        avatar_url: None,
    };

    match intake.post_welcome(ChannelId(100), None, Utc::now()).await {
        Ok(_) => println!("- Welcome card posted to the intake channel"),
        Err(err) => {
            println!("  Welcome card failed: {err}");
            return Ok(());
        }
    }

    let attachments = if args.with_attachments {
        vec![AttachmentDescriptor {
            filename: "skyline-demo.mp3".to_string(),
            size_bytes: 4 * 1024 * 1024,
            url: "https://cdn.example/skyline-demo.mp3".to_string(),
        }]
    } else {
        Vec::new()
    };

    let fields = SubmissionFields {
        artist_name: "Nova".to_string(),
        song_name: "Skyline".to_string(),
        song_link: "https://soundcloud.example/nova/skyline".to_string(),
        genre: "Synthwave".to_string(),
        socials: "@nova".to_string(),
    };

    let receipt = match intake
        .submit(fields.clone(), attachments, &submitter, Utc::now())
        .await
    {
        Ok(receipt) => receipt,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    let Some((location, posted)) = receipt.posted.zip(gateway.posts().last().cloned()) else {
        println!("  No intake channel configured, nothing to review");
        return Ok(());
    };
    println!(
        "- Submission card posted (channel {}, message {})",
        location.channel.0, location.message.0
    );
    match serde_json::to_string_pretty(&posted.card) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  Card unavailable: {err}"),
    }

    println!("\nReviewer accepts the submission:");
    match review.accept(&posted.card, location, &reviewer).await {
        Ok(report) => println!("{}", compose_review_reply(&report)),
        Err(err) => println!("  Review failed: {err}"),
    }

    println!("\nA second submission arrives and is denied:");
    let receipt = match intake
        .submit(fields, Vec::new(), &submitter, Utc::now())
        .await
    {
        Ok(receipt) => receipt,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    let Some((location, posted)) = receipt.posted.zip(gateway.posts().last().cloned()) else {
        println!("  No intake channel configured, nothing to review");
        return Ok(());
    };
    match review
        .deny(&posted.card, location, &reviewer, "Low audio quality")
        .await
    {
        Ok(report) => println!("{}", compose_review_reply(&report)),
        Err(err) => println!("  Review failed: {err}"),
    }

    println!("\nGateway activity:");
    for delivery in gateway.posts() {
        println!(
            "- posted to channel {}: {}",
            delivery.location.channel.0, delivery.card.title
        );
    }
    for location in gateway.deletes() {
        println!(
            "- deleted message {} from channel {}",
            location.message.0, location.channel.0
        );
    }
    for (user, card) in gateway.directs() {
        println!("- direct message to {}: {}", user.0, card.title);
    }

    Ok(())
}
