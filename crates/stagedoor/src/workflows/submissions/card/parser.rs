use regex::Regex;
use std::sync::OnceLock;

use super::super::domain::{SubmissionFields, UserId};
use super::{Card, REJECTION_REASON_FIELD, REVIEW_STATUS_FIELD};

/// Structured view recovered from a rendered card.
///
/// The decode is total: missing fields come back empty, a missing or
/// malformed footer token comes back as `submitter_id = None`, and callers
/// decide how to handle the absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubmission {
    pub fields: SubmissionFields,
    pub attachments_note: Option<String>,
    pub submitter_id: Option<UserId>,
    /// Raw Review Status value when the card has already been reviewed.
    pub review: Option<String>,
}

impl ParsedSubmission {
    pub fn is_reviewed(&self) -> bool {
        self.review.is_some()
    }
}

/// Recover structured fields and submitter identity from a card as last
/// displayed. Field recovery is positional: index determines semantic role
/// for the five core fields; the trailing slots hold the attachments listing
/// and review metadata, in that order when both are present.
pub fn parse_card(card: &Card) -> ParsedSubmission {
    let value_at = |index: usize| -> String {
        card.fields
            .get(index)
            .map(|field| field.value.clone())
            .unwrap_or_default()
    };

    let fields = SubmissionFields {
        artist_name: value_at(0),
        song_name: value_at(1),
        song_link: value_at(2),
        genre: value_at(3),
        socials: value_at(4),
    };

    let mut attachments_note = None;
    let mut review = None;
    for field in card.fields.iter().skip(5) {
        if field.name == REVIEW_STATUS_FIELD {
            review.get_or_insert_with(|| field.value.clone());
        } else if field.name != REJECTION_REASON_FIELD && attachments_note.is_none() {
            attachments_note = Some(field.value.clone());
        }
    }

    let submitter_id = card
        .footer_text
        .as_deref()
        .and_then(submitter_from_footer);

    ParsedSubmission {
        fields,
        attachments_note,
        submitter_id,
        review,
    }
}

/// Extract the `(ID: <digits>)` token from a footer, tolerating footers
/// written before the token existed.
pub fn submitter_from_footer(footer: &str) -> Option<UserId> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let token = TOKEN.get_or_init(|| {
        Regex::new(r"\(ID:\s*(\d+)\)").expect("submitter token pattern is valid")
    });

    token
        .captures(footer)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
        .map(UserId)
}
