use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use super::card::{Card, Control, ControlStyle};
use super::domain::{ChannelId, MessageId, MessageRef, StickerId, UserId};
use super::gateway::{ChatGateway, GatewayError};

const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";

/// REST-backed gateway speaking the platform's HTTP API with a bot token.
pub struct RestChatGateway {
    http: Client,
    token: String,
    base_url: String,
}

impl RestChatGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Point the gateway at a different API root (used by tests and mocks).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn post_message(
        &self,
        channel: ChannelId,
        body: Value,
    ) -> Result<MessageRef, GatewayError> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel.0);
        let response = self
            .http
            .post(&url)
            .header("Authorization", self.authorization())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let payload = check(response).await?;

        let message = snowflake(&payload, "id")?;
        debug!(channel = channel.0, message, "message posted");

        Ok(MessageRef {
            channel,
            message: MessageId(message),
        })
    }
}

#[async_trait]
impl ChatGateway for RestChatGateway {
    async fn post_card(
        &self,
        channel: ChannelId,
        content: Option<String>,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<MessageRef, GatewayError> {
        let mut body = json!({
            "embeds": [embed_json(&card)],
            "components": components_json(&controls),
        });
        if let Some(content) = content {
            body["content"] = Value::String(content);
        }

        self.post_message(channel, body).await
    }

    async fn update_card(
        &self,
        location: MessageRef,
        card: Card,
        controls: Vec<Control>,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, location.channel.0, location.message.0
        );
        let body = json!({
            "embeds": [embed_json(&card)],
            "components": components_json(&controls),
        });

        let response = self
            .http
            .patch(&url)
            .header("Authorization", self.authorization())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn delete_message(&self, location: MessageRef) -> Result<(), GatewayError> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, location.channel.0, location.message.0
        );
        let response = self
            .http
            .delete(&url)
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::FORBIDDEN => Err(GatewayError::Forbidden),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            status if status.is_success() => Ok(()),
            status => Err(GatewayError::Transport(format!(
                "unexpected status {status} deleting message"
            ))),
        }
    }

    async fn send_direct(&self, user: UserId, card: Card) -> Result<(), GatewayError> {
        let url = format!("{}/users/@me/channels", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", self.authorization())
            .json(&json!({ "recipient_id": user.0.to_string() }))
            .send()
            .await
            .map_err(transport)?;
        let payload = check(response).await?;
        let dm_channel = ChannelId(snowflake(&payload, "id")?);

        self.post_message(dm_channel, json!({ "embeds": [embed_json(&card)] }))
            .await
            .map(|_| ())
    }

    async fn send_sticker_reply(
        &self,
        to: MessageRef,
        sticker: StickerId,
    ) -> Result<(), GatewayError> {
        let body = json!({
            "sticker_ids": [sticker.0.to_string()],
            "message_reference": { "message_id": to.message.0.to_string() },
        });

        self.post_message(to.channel, body).await.map(|_| ())
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

async fn check(response: Response) -> Result<Value, GatewayError> {
    match response.status() {
        StatusCode::FORBIDDEN => Err(GatewayError::Forbidden),
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
        status if status.is_success() => response.json::<Value>().await.map_err(transport),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::Transport(format!(
                "unexpected status {status}: {body}"
            )))
        }
    }
}

/// Ids arrive as decimal strings on the wire.
fn snowflake(payload: &Value, key: &str) -> Result<u64, GatewayError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<u64>().ok())
        .ok_or_else(|| GatewayError::Transport(format!("response is missing a numeric '{key}'")))
}

fn embed_json(card: &Card) -> Value {
    let mut embed = json!({
        "title": card.title,
        "color": card.color,
        "fields": card
            .fields
            .iter()
            .map(|field| {
                json!({
                    "name": field.name,
                    "value": field.value,
                    "inline": field.inline,
                })
            })
            .collect::<Vec<_>>(),
    });

    if let Some(description) = &card.description {
        embed["description"] = Value::String(description.clone());
    }
    if let Some(text) = &card.footer_text {
        let mut footer = json!({ "text": text });
        if let Some(icon) = &card.footer_icon {
            footer["icon_url"] = Value::String(icon.clone());
        }
        embed["footer"] = footer;
    }
    if let Some(timestamp) = &card.timestamp {
        embed["timestamp"] = Value::String(timestamp.to_rfc3339());
    }
    if let Some(url) = &card.url {
        embed["url"] = Value::String(url.clone());
    }
    if let Some(name) = &card.author_name {
        let mut author = json!({ "name": name });
        if let Some(url) = &card.author_url {
            author["url"] = Value::String(url.clone());
        }
        embed["author"] = author;
    }
    if let Some(image) = &card.image_url {
        embed["image"] = json!({ "url": image });
    }

    embed
}

fn components_json(controls: &[Control]) -> Value {
    if controls.is_empty() {
        return json!([]);
    }

    json!([{
        "type": 1,
        "components": controls
            .iter()
            .map(|control| {
                json!({
                    "type": 2,
                    "custom_id": control.custom_id,
                    "label": control.label,
                    "style": style_code(control.style),
                    "disabled": control.disabled,
                })
            })
            .collect::<Vec<_>>(),
    }])
}

const fn style_code(style: ControlStyle) -> u8 {
    match style {
        ControlStyle::Primary => 1,
        ControlStyle::Secondary => 2,
        ControlStyle::Success => 3,
        ControlStyle::Danger => 4,
    }
}
