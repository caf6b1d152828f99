use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::entities::users::UserEntity;

/// All writers of a user's subscription window go through this trait.
/// `extend_subscription` and the revoke operations are each one atomic
/// read-modify-write at the storage layer, so concurrent purchases,
/// admin actions and sweeps cannot lose updates.
#[automock]
#[async_trait]
pub trait UserRepository {
    async fn ensure_user(&self, user_id: i64, username: Option<String>) -> Result<()>;

    async fn find(&self, user_id: i64) -> Result<Option<UserEntity>>;

    /// Extends from `max(now, current end)`, so remaining time is kept
    /// and lapsed users start counting from now. Returns `None` for an
    /// unknown user.
    async fn extend_subscription(
        &self,
        user_id: i64,
        days: i64,
    ) -> Result<Option<DateTime<Utc>>>;

    async fn revoke_subscription(&self, user_id: i64) -> Result<()>;

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<UserEntity>>;

    /// Users whose end date falls in the half-open window `(after, until]`.
    async fn list_expiring_between(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<UserEntity>>;

    async fn list_user_ids(&self) -> Result<Vec<i64>>;

    async fn count_users(&self) -> Result<i64>;

    async fn count_active(&self, now: DateTime<Utc>) -> Result<i64>;
}
