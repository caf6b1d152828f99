use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Capabilities the core consumes from the messaging layer. All of them
/// are best-effort from the caller's point of view: delivery failures
/// are logged by the caller and never abort the owning operation.
#[automock]
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()>;

    async fn send_photo(&self, user_id: i64, photo_id: &str, caption: &str) -> Result<()>;

    /// Mints a single-use invite link that expires after `ttl_secs`.
    async fn create_invite_link(&self, channel_id: i64, ttl_secs: i64) -> Result<String>;

    async fn remove_member(&self, channel_id: i64, user_id: i64) -> Result<()>;
}
