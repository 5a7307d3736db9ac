use serde::{Deserialize, Serialize};

/// Opaque stable identifier of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identifier of a delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Identifier of a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// Identifier of an uploadable sticker asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerId(pub u64);

/// Location of a posted card: the channel it lives in and its message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: ChannelId,
    pub message: MessageId,
}

/// Display identity of the user driving an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Free-text fields collected by the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFields {
    pub artist_name: String,
    pub song_name: String,
    pub song_link: String,
    pub genre: String,
    pub socials: String,
}

/// Intake bounds for each form field, matching the submission form limits.
pub const MAX_ARTIST_NAME_LEN: usize = 100;
pub const MAX_SONG_NAME_LEN: usize = 100;
pub const MAX_SONG_LINK_LEN: usize = 200;
pub const MAX_GENRE_LEN: usize = 500;
pub const MAX_SOCIALS_LEN: usize = 500;

/// Uploaded file metadata as delivered by the intake surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub filename: String,
    pub size_bytes: u64,
    pub url: String,
}

/// Lifecycle status of a submission card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Accepted,
    Denied,
    Held,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Accepted => "Accepted",
            ReviewStatus::Denied => "Denied",
            ReviewStatus::Held => "Held",
        }
    }

    /// Every status except `Pending` admits no further transition.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

/// Reviewer action over a pending card. Closed set; the transition function
/// matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Deny { reason: String },
    Hold,
}

impl ReviewAction {
    pub fn status(&self) -> ReviewStatus {
        match self {
            ReviewAction::Accept => ReviewStatus::Accepted,
            ReviewAction::Deny { .. } => ReviewStatus::Denied,
            ReviewAction::Hold => ReviewStatus::Held,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ReviewAction::Deny { reason } => Some(reason.as_str()),
            ReviewAction::Accept | ReviewAction::Hold => None,
        }
    }
}
