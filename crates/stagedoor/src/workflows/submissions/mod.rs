//! Submission intake and review: card encoding/decoding, the review state
//! machine, destination routing, and submitter notification.
//!
//! A submission is materialized only as its rendered card; there is no
//! separate store. The card's footer token carries the submitter's identity
//! so the whole lifecycle survives process restarts.

pub mod attachments;
pub mod card;
pub mod domain;
pub mod gateway;
pub mod http;
pub mod intake;
pub mod notify;
pub mod rest;
pub mod review;
pub mod routing;

#[cfg(test)]
mod tests;

pub use attachments::{AttachmentPolicy, AttachmentRejection};
pub use card::{parse_card, Card, CardField, Control, ControlStyle, ParsedSubmission};
pub use domain::{
    AttachmentDescriptor, ChannelId, MessageId, MessageRef, ReviewAction, ReviewStatus,
    StickerId, SubmissionFields, UserId, UserProfile,
};
pub use gateway::{ChatGateway, GatewayError};
pub use http::{interaction_router, InteractionEvent, InteractionReply, SubmissionApp};
pub use intake::{IntakeError, IntakeReceipt, IntakeService};
pub use notify::{Notifier, NotifyError};
pub use rest::RestChatGateway;
pub use review::{
    DenyTicket, NotificationOutcome, ReviewError, ReviewReport, ReviewService,
};
pub use routing::{ChannelDirectory, ChannelRouter, DestinationKind, RoutingError};
