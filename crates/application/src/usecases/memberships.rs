use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use domain::{
    repositories::users::UserRepository,
    value_objects::memberships::MembershipProfile,
};

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type MembershipResult<T> = std::result::Result<T, MembershipError>;

/// Admin-facing surface over a user's subscription window. The payment
/// path shares the same storage-level extension rule, so manual and
/// automatic extensions behave identically.
pub struct MembershipUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> MembershipUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn extend(&self, user_id: i64, days: i64) -> MembershipResult<DateTime<Utc>> {
        if days <= 0 {
            return Err(MembershipError::Validation(
                "days must be a positive number".to_string(),
            ));
        }

        let new_end = self
            .user_repo
            .extend_subscription(user_id, days)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "memberships: failed to extend subscription");
                MembershipError::Internal(err)
            })?
            .ok_or(MembershipError::UserNotFound)?;

        info!(user_id, days, new_end = %new_end, "memberships: subscription extended");
        Ok(new_end)
    }

    pub async fn revoke(&self, user_id: i64) -> MembershipResult<()> {
        let user = self.user_repo.find(user_id).await.map_err(|err| {
            error!(user_id, db_error = ?err, "memberships: failed to load user for revoke");
            MembershipError::Internal(err)
        })?;

        if user.is_none() {
            warn!(user_id, "memberships: revoke requested for unknown user");
            return Err(MembershipError::UserNotFound);
        }

        self.user_repo
            .revoke_subscription(user_id)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "memberships: failed to revoke subscription");
                MembershipError::Internal(err)
            })?;

        info!(user_id, "memberships: subscription revoked");
        Ok(())
    }

    pub async fn profile(&self, user_id: i64) -> MembershipResult<MembershipProfile> {
        let user = self
            .user_repo
            .find(user_id)
            .await
            .map_err(MembershipError::Internal)?
            .ok_or(MembershipError::UserNotFound)?;

        let now = Utc::now();
        Ok(MembershipProfile {
            user_id: user.id,
            username: user.username.clone(),
            subscription_end: user.subscription_end,
            active: user.is_active_at(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::entities::users::UserEntity;
    use domain::repositories::users::MockUserRepository;

    fn user(id: i64, end: Option<DateTime<Utc>>) -> UserEntity {
        UserEntity {
            id,
            username: Some("someone".to_string()),
            subscription_end: end,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn extend_returns_the_new_end_date() {
        let expected = Utc::now() + Duration::days(30);
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_extend_subscription()
            .withf(|user_id, days| *user_id == 42 && *days == 30)
            .returning(move |_, _| Ok(Some(expected)));

        let usecase = MembershipUseCase::new(Arc::new(user_repo));
        let new_end = usecase.extend(42, 30).await.unwrap();
        assert_eq!(new_end, expected);
    }

    #[tokio::test]
    async fn extend_rejects_non_positive_days() {
        let usecase = MembershipUseCase::new(Arc::new(MockUserRepository::new()));

        let result = usecase.extend(42, 0).await;
        assert!(matches!(result, Err(MembershipError::Validation(_))));
    }

    #[tokio::test]
    async fn extend_surfaces_unknown_users() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_extend_subscription()
            .returning(|_, _| Ok(None));

        let usecase = MembershipUseCase::new(Arc::new(user_repo));
        let result = usecase.extend(404, 7).await;
        assert!(matches!(result, Err(MembershipError::UserNotFound)));
    }

    #[tokio::test]
    async fn revoke_requires_an_existing_user() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find().returning(|_| Ok(None));

        let usecase = MembershipUseCase::new(Arc::new(user_repo));
        let result = usecase.revoke(404).await;
        assert!(matches!(result, Err(MembershipError::UserNotFound)));
    }

    #[tokio::test]
    async fn profile_reports_expired_subscription_as_inactive() {
        let yesterday = Utc::now() - Duration::days(1);
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find()
            .returning(move |id| Ok(Some(user(id, Some(yesterday)))));

        let usecase = MembershipUseCase::new(Arc::new(user_repo));
        let profile = usecase.profile(42).await.unwrap();
        assert!(!profile.active);
        assert_eq!(profile.subscription_end, Some(yesterday));
    }

    #[tokio::test]
    async fn profile_reports_future_subscription_as_active() {
        let tomorrow = Utc::now() + Duration::days(1);
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find()
            .returning(move |id| Ok(Some(user(id, Some(tomorrow)))));

        let usecase = MembershipUseCase::new(Arc::new(user_repo));
        let profile = usecase.profile(42).await.unwrap();
        assert!(profile.active);
    }
}
