use std::sync::Arc;

use super::card::outcome_card;
use super::domain::{ReviewStatus, SubmissionFields, UserId};
use super::gateway::{ChatGateway, GatewayError};

/// Notification failure. Review completion never depends on this succeeding.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("the submitter is unreachable")]
    Unreachable,
    #[error(transparent)]
    Gateway(GatewayError),
}

/// Delivers the private outcome message to the original submitter.
pub struct Notifier<G> {
    gateway: Arc<G>,
}

impl<G> Notifier<G>
where
    G: ChatGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn notify(
        &self,
        submitter: UserId,
        status: ReviewStatus,
        reason: Option<&str>,
        fields: &SubmissionFields,
    ) -> Result<(), NotifyError> {
        let card = outcome_card(status, reason, fields);

        self.gateway
            .send_direct(submitter, card)
            .await
            .map_err(|err| match err {
                GatewayError::Forbidden => NotifyError::Unreachable,
                other => NotifyError::Gateway(other),
            })
    }
}
