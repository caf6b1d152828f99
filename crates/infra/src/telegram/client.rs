use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use url::Url;

use domain::repositories::channel::ChannelGateway;

/// Minimal Telegram Bot API client built on reqwest. Only the calls the
/// core consumes are implemented.
pub struct TelegramChannelClient {
    http: reqwest::Client,
    api_base: Url,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    result: Option<serde_json::Value>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChatInviteLink {
    invite_link: String,
}

impl TelegramChannelClient {
    pub fn new(bot_token: &str) -> Result<Self> {
        let api_base = Url::parse(&format!("https://api.telegram.org/bot{bot_token}/"))?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self { http, api_base })
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = self.api_base.join(method)?;

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(method, err))?;

        let status = response.status();
        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|err| sanitize_reqwest_error(method, err))?;

        if !envelope.ok {
            error!(
                method,
                http_status = %status,
                api_error_code = ?envelope.error_code,
                api_description = ?envelope.description,
                "telegram api request failed"
            );
            bail!(
                "Telegram API request failed: {} (error_code={:?})",
                method,
                envelope.error_code
            );
        }

        envelope
            .result
            .ok_or_else(|| anyhow!("Telegram API response for {method} is missing a result"))
    }
}

#[async_trait]
impl ChannelGateway for TelegramChannelClient {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()> {
        self.call("sendMessage", json!({ "chat_id": user_id, "text": text }))
            .await?;

        Ok(())
    }

    async fn send_photo(&self, user_id: i64, photo_id: &str, caption: &str) -> Result<()> {
        self.call(
            "sendPhoto",
            json!({ "chat_id": user_id, "photo": photo_id, "caption": caption }),
        )
        .await?;

        Ok(())
    }

    async fn create_invite_link(&self, channel_id: i64, ttl_secs: i64) -> Result<String> {
        // member_limit=1 makes the link single use.
        let result = self
            .call(
                "createChatInviteLink",
                json!({
                    "chat_id": channel_id,
                    "expire_date": Utc::now().timestamp() + ttl_secs,
                    "member_limit": 1,
                }),
            )
            .await?;

        let link: ChatInviteLink = serde_json::from_value(result)?;
        Ok(link.invite_link)
    }

    async fn remove_member(&self, channel_id: i64, user_id: i64) -> Result<()> {
        // Ban then unban: the user is out of the channel but free to
        // rejoin through a future invite link.
        self.call(
            "banChatMember",
            json!({ "chat_id": channel_id, "user_id": user_id }),
        )
        .await?;

        self.call(
            "unbanChatMember",
            json!({ "chat_id": channel_id, "user_id": user_id, "only_if_banned": true }),
        )
        .await?;

        Ok(())
    }
}

// Request URLs embed the bot token, so reqwest errors are never
// surfaced verbatim.
fn sanitize_reqwest_error(method: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("telegram api request timed out: {method}");
    }
    if error.is_connect() {
        return anyhow!("telegram api connection failed: {method}");
    }
    anyhow!("telegram api request failed: {method}")
}
