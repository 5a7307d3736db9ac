//! Rendered submission cards: the platform-neutral embed model plus the
//! encode/decode pair that makes a card the sole carrier of submission state.

mod encoder;
mod parser;

pub use encoder::{
    destination_card, outcome_card, review_status_field, submission_card, welcome_card,
};
pub use parser::{parse_card, submitter_from_footer, ParsedSubmission};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SUBMISSION_CARD_COLOR: u32 = 0x00ff00;
pub const WELCOME_CARD_COLOR: u32 = 0x9b59b6;
pub const ACCEPTED_CARD_COLOR: u32 = 0x2ecc71;
pub const DENIED_CARD_COLOR: u32 = 0xe74c3c;
pub const HELD_CARD_COLOR: u32 = 0xf1c40f;

/// Ordered display-field names. The first five are a positional contract
/// between the encoder and the parser; the trailing two are optional.
pub const CORE_FIELD_NAMES: [&str; 5] = ["Artist", "Song", "Link", "Genre", "Socials"];
pub const ATTACHMENTS_FIELD: &str = "Attachments";
pub const REVIEW_STATUS_FIELD: &str = "Review Status";
pub const REJECTION_REASON_FIELD: &str = "Rejection Reason";

/// One named field on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rendered embed: display fields plus the footer metadata that makes the
/// card self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<CardField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: Vec::new(),
            footer_text: None,
            footer_icon: None,
            timestamp: None,
            url: None,
            author_name: None,
            author_url: None,
            image_url: None,
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Whether the card already records a terminal review.
    pub fn is_reviewed(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.name == REVIEW_STATUS_FIELD)
    }
}

pub const SUBMIT_BUTTON_ID: &str = "submit_music_button";
pub const ACCEPT_BUTTON_ID: &str = "review_accept";
pub const DENY_BUTTON_ID: &str = "review_deny";
pub const HOLD_BUTTON_ID: &str = "review_hold";
pub const MARK_POSTED_BUTTON_ID: &str = "mark_posted";

/// Visual style of an interactive control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// Interactive control attached to a posted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub custom_id: String,
    pub label: String,
    pub style: ControlStyle,
    pub disabled: bool,
}

impl Control {
    fn new(custom_id: &str, label: &str, style: ControlStyle, disabled: bool) -> Self {
        Self {
            custom_id: custom_id.to_string(),
            label: label.to_string(),
            style,
            disabled,
        }
    }
}

/// The persistent intake button shown under the welcome card.
pub fn submit_control() -> Vec<Control> {
    vec![Control::new(
        SUBMIT_BUTTON_ID,
        "📝 Submit Your Music",
        ControlStyle::Primary,
        false,
    )]
}

/// Accept/deny/hold controls attached to every pending submission card.
pub fn review_controls(disabled: bool) -> Vec<Control> {
    vec![
        Control::new(ACCEPT_BUTTON_ID, "✅ Accept", ControlStyle::Success, disabled),
        Control::new(DENY_BUTTON_ID, "❌ Deny", ControlStyle::Danger, disabled),
        Control::new(HOLD_BUTTON_ID, "⏸️ Hold", ControlStyle::Secondary, disabled),
    ]
}

/// Toggle reconstructed on accepted-channel cards.
pub fn posted_toggle() -> Vec<Control> {
    vec![Control::new(
        MARK_POSTED_BUTTON_ID,
        "Mark as Posted",
        ControlStyle::Secondary,
        false,
    )]
}

/// Replacement control once an accepted item has been marked posted.
pub fn posted_done() -> Vec<Control> {
    vec![Control::new(
        MARK_POSTED_BUTTON_ID,
        "✅ Posted",
        ControlStyle::Success,
        true,
    )]
}
