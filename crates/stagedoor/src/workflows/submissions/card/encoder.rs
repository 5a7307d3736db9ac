use chrono::{DateTime, Utc};

use super::super::domain::{
    AttachmentDescriptor, ReviewAction, ReviewStatus, SubmissionFields, UserProfile,
};
use super::parser::ParsedSubmission;
use super::{
    Card, CardField, ACCEPTED_CARD_COLOR, ATTACHMENTS_FIELD, DENIED_CARD_COLOR, HELD_CARD_COLOR,
    REJECTION_REASON_FIELD, REVIEW_STATUS_FIELD, SUBMISSION_CARD_COLOR, WELCOME_CARD_COLOR,
};

/// Render a submission into its canonical card.
///
/// Field order and the position of the optional attachments field are a
/// stable contract with the parser. The footer token is the only durable
/// carrier of submitter identity.
pub fn submission_card(
    fields: &SubmissionFields,
    submitter: &UserProfile,
    attachments: &[AttachmentDescriptor],
    submitted_at: DateTime<Utc>,
) -> Card {
    let mut card = Card::new("📝 New Form Submission", SUBMISSION_CARD_COLOR);
    card.timestamp = Some(submitted_at);

    card.add_field("Artist", &fields.artist_name, true);
    card.add_field("Song", &fields.song_name, true);
    card.add_field("Link", &fields.song_link, false);
    card.add_field("Genre", &fields.genre, false);
    card.add_field("Socials", &fields.socials, false);

    if !attachments.is_empty() {
        card.add_field(ATTACHMENTS_FIELD, attachments_note(attachments), false);
    }

    card.footer_text = Some(format!(
        "Submitted by {} (ID: {})",
        submitter.display_name, submitter.id.0
    ));
    card.footer_icon = submitter.avatar_url.clone();

    card
}

fn attachments_note(attachments: &[AttachmentDescriptor]) -> String {
    attachments
        .iter()
        .map(|attachment| attachment.filename.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The field appended to the original card on a terminal transition.
pub fn review_status_field(action: &ReviewAction, reviewer_name: &str) -> CardField {
    let value = match action {
        ReviewAction::Accept => format!("Accepted by {reviewer_name}"),
        ReviewAction::Deny { reason } => {
            format!("Denied by {reviewer_name}\nReason: {reason}")
        }
        ReviewAction::Hold => format!("Held by {reviewer_name}"),
    };

    CardField {
        name: REVIEW_STATUS_FIELD.to_string(),
        value,
        inline: false,
    }
}

/// Build the summary card posted to a destination channel.
///
/// Display fields are copied verbatim from the parsed original; the only
/// review metadata allowed through is the rejection reason on denied items.
/// The footer is preserved so submitter identity survives relocation.
pub fn destination_card(
    original: &Card,
    parsed: &ParsedSubmission,
    status: ReviewStatus,
    reason: Option<&str>,
) -> Card {
    let (title, color) = match status {
        ReviewStatus::Accepted => ("Accepted Submission", ACCEPTED_CARD_COLOR),
        ReviewStatus::Denied => ("Rejected Submission", DENIED_CARD_COLOR),
        ReviewStatus::Held => ("Held Submission", HELD_CARD_COLOR),
        ReviewStatus::Pending => ("📝 New Form Submission", SUBMISSION_CARD_COLOR),
    };

    let mut card = Card::new(title, color);
    card.timestamp = original.timestamp;

    card.add_field("Artist", &parsed.fields.artist_name, true);
    card.add_field("Song", &parsed.fields.song_name, true);
    card.add_field("Link", &parsed.fields.song_link, false);
    card.add_field("Genre", &parsed.fields.genre, false);
    card.add_field("Socials", &parsed.fields.socials, false);

    if let Some(note) = &parsed.attachments_note {
        card.add_field(ATTACHMENTS_FIELD, note, false);
    }

    if status == ReviewStatus::Denied {
        if let Some(reason) = reason {
            card.add_field(REJECTION_REASON_FIELD, reason, false);
        }
    }

    card.footer_text = original.footer_text.clone();
    card.footer_icon = original.footer_icon.clone();

    card
}

/// The private outcome card delivered to the submitter.
pub fn outcome_card(status: ReviewStatus, reason: Option<&str>, fields: &SubmissionFields) -> Card {
    let color = match status {
        ReviewStatus::Accepted => ACCEPTED_CARD_COLOR,
        ReviewStatus::Denied => DENIED_CARD_COLOR,
        ReviewStatus::Held => HELD_CARD_COLOR,
        ReviewStatus::Pending => SUBMISSION_CARD_COLOR,
    };

    let mut card = Card::new(format!("Your Submission Status: {}", status.label()), color);

    card.description = match status {
        ReviewStatus::Denied => reason.map(|reason| format!("**Reason for rejection:**\n{reason}")),
        ReviewStatus::Accepted => Some("Great news! Your submission has been accepted.".to_string()),
        ReviewStatus::Held => Some(
            "Your submission has been placed on hold while reviewers take another look."
                .to_string(),
        ),
        ReviewStatus::Pending => None,
    };

    card.add_field("Artist", &fields.artist_name, true);
    card.add_field("Song", &fields.song_name, true);
    card.add_field("Link", &fields.song_link, false);
    card.add_field("Genre", &fields.genre, false);
    card.add_field("Socials", &fields.socials, false);

    card
}

/// The standing invitation posted by the owner-gated intake command.
pub fn welcome_card(guild_icon: Option<&str>, posted_at: DateTime<Utc>) -> Card {
    let mut card = Card::new("Welcome to Music Submissions!", WELCOME_CARD_COLOR);
    card.description = Some(
        "Ready to share your music with the world? This is the place to submit your tracks for consideration!"
            .to_string(),
    );
    card.timestamp = Some(posted_at);

    card.add_field(
        "What to Submit",
        "• Original music tracks\n• Collaborative works\n• Creative content",
        true,
    );
    card.add_field(
        "What We're Looking For",
        "• Quality production\n• Unique sounds\n• Passionate artists\n• Creative expression",
        true,
    );
    card.add_field(
        "How to Submit",
        "Click the button below to open our submission form. Fill out all the required information about your track and we'll review it!",
        false,
    );

    card.footer_text = Some("Ready to get started? Click the button below!".to_string());
    card.footer_icon = guild_icon.map(str::to_string);

    card
}
