use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;

use stagedoor::workflows::submissions::card::{Card, Control};
use stagedoor::workflows::submissions::domain::{
    ChannelId, MessageId, MessageRef, StickerId, UserId,
};
use stagedoor::workflows::submissions::gateway::{ChatGateway, GatewayError};
use stagedoor::workflows::submissions::routing::ChannelDirectory;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One recorded delivery through the in-memory gateway.
#[derive(Debug, Clone)]
pub(crate) struct Delivery {
    pub(crate) location: MessageRef,
    pub(crate) content: Option<String>,
    pub(crate) card: Card,
    pub(crate) controls: Vec<Control>,
}

/// Offline gateway backing the demo: records everything, fails nothing.
#[derive(Default)]
pub(crate) struct InMemoryChatGateway {
    next_message_id: Mutex<u64>,
    posts: Mutex<Vec<Delivery>>,
    deletes: Mutex<Vec<MessageRef>>,
    directs: Mutex<Vec<(UserId, Card)>>,
}

impl InMemoryChatGateway {
    pub(crate) fn posts(&self) -> Vec<Delivery> {
        self.posts.lock().expect("gateway mutex poisoned").clone()
    }

    pub(crate) fn deletes(&self) -> Vec<MessageRef> {
        self.deletes.lock().expect("gateway mutex poisoned").clone()
    }

    pub(crate) fn directs(&self) -> Vec<(UserId, Card)> {
        self.directs.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ChatGateway for InMemoryChatGateway {
    async fn post_card(
        &self,
        channel: ChannelId,
        content: Option<String>,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<MessageRef, GatewayError> {
        let mut next = self.next_message_id.lock().expect("gateway mutex poisoned");
        *next += 1;
        let location = MessageRef {
            channel,
            message: MessageId(*next),
        };

        self.posts
            .lock()
            .expect("gateway mutex poisoned")
            .push(Delivery {
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
        self.posts
            .lock()
            .expect("gateway mutex poisoned")
            .push(Delivery {
                location,
                content: None,
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
        self.directs
            .lock()
            .expect("gateway mutex poisoned")
            .push((user, card));
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

/// Fixed channel layout used by the offline demo.
pub(crate) fn demo_directory() -> ChannelDirectory {
    ChannelDirectory {
        intake: Some(ChannelId(100)),
        accepted: Some(ChannelId(200)),
        denied: Some(ChannelId(300)),
        held: Some(ChannelId(400)),
    }
}
