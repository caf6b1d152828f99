use anyhow::Result;
use chrono::Utc;
use domain::repositories::{
    channel::ChannelGateway, settings::SettingRepository, users::UserRepository,
};
use domain::value_objects::settings::SettingKey;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// Pause between processed users to stay inside outbound rate limits.
const INTER_USER_DELAY: Duration = Duration::from_millis(500);

const EXPIRED_NOTICE: &str =
    "Your subscription has expired. You can renew it any time from the payment menu.";

#[derive(Debug, Clone, Default)]
pub struct RevokeSweepResult {
    pub scanned: usize,
    pub revoked: usize,
    pub remove_failed: usize,
    pub notify_failed: usize,
}

/// Finds users whose end date has passed, removes them from the
/// channel, notifies them best-effort and clears the end date. One
/// failing user never aborts the rest of the batch.
pub struct RevokeExpiredSubscriptionsUseCase {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    setting_repo: Arc<dyn SettingRepository + Send + Sync>,
    channel: Arc<dyn ChannelGateway + Send + Sync>,
}

impl RevokeExpiredSubscriptionsUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        setting_repo: Arc<dyn SettingRepository + Send + Sync>,
        channel: Arc<dyn ChannelGateway + Send + Sync>,
    ) -> Self {
        Self {
            user_repo,
            setting_repo,
            channel,
        }
    }

    pub async fn run(&self) -> Result<RevokeSweepResult> {
        let Some(channel_id) = self.configured_channel_id().await else {
            warn!("revoke_sweep: channel id is not configured; skipping run");
            return Ok(RevokeSweepResult::default());
        };

        let expired = self.user_repo.list_expired(Utc::now()).await?;
        let mut result = RevokeSweepResult {
            scanned: expired.len(),
            ..Default::default()
        };

        if expired.is_empty() {
            info!("revoke_sweep: no expired subscriptions found");
            return Ok(result);
        }

        for user in expired {
            if let Err(err) = self.channel.remove_member(channel_id, user.id).await {
                error!(
                    user_id = user.id,
                    error = ?err,
                    "revoke_sweep: failed to remove member; continuing"
                );
                result.remove_failed += 1;
            }

            if let Err(err) = self.channel.send_text(user.id, EXPIRED_NOTICE).await {
                warn!(
                    user_id = user.id,
                    error = ?err,
                    "revoke_sweep: failed to notify user about expiry"
                );
                result.notify_failed += 1;
            }

            match self.user_repo.revoke_subscription(user.id).await {
                Ok(()) => result.revoked += 1,
                Err(err) => {
                    error!(
                        user_id = user.id,
                        db_error = ?err,
                        "revoke_sweep: failed to clear subscription end"
                    );
                }
            }

            tokio::time::sleep(INTER_USER_DELAY).await;
        }

        info!(
            scanned = result.scanned,
            revoked = result.revoked,
            remove_failed = result.remove_failed,
            notify_failed = result.notify_failed,
            "revoke_sweep: completed"
        );

        Ok(result)
    }

    async fn configured_channel_id(&self) -> Option<i64> {
        match self.setting_repo.get(SettingKey::ChannelId).await {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(err) => {
                error!(db_error = ?err, "revoke_sweep: failed to load channel id setting");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{Duration as ChronoDuration, Utc};
    use domain::entities::users::UserEntity;
    use domain::repositories::{
        channel::MockChannelGateway, settings::MockSettingRepository, users::MockUserRepository,
    };

    fn expired_user(id: i64) -> UserEntity {
        UserEntity {
            id,
            username: None,
            subscription_end: Some(Utc::now() - ChronoDuration::days(1)),
            created_at: Utc::now() - ChronoDuration::days(60),
        }
    }

    fn channel_setting() -> MockSettingRepository {
        let mut setting_repo = MockSettingRepository::new();
        setting_repo
            .expect_get()
            .returning(|_| Ok(Some("-1001234".to_string())));
        setting_repo
    }

    #[tokio::test]
    async fn revokes_expired_users_and_clears_their_end_dates() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expired()
            .returning(|_| Ok(vec![expired_user(1), expired_user(2)]));
        user_repo
            .expect_revoke_subscription()
            .times(2)
            .returning(|_| Ok(()));

        let mut channel = MockChannelGateway::new();
        channel
            .expect_remove_member()
            .withf(|channel_id, _| *channel_id == -1001234)
            .times(2)
            .returning(|_, _| Ok(()));
        channel.expect_send_text().times(2).returning(|_, _| Ok(()));

        let usecase = RevokeExpiredSubscriptionsUseCase::new(
            Arc::new(user_repo),
            Arc::new(channel_setting()),
            Arc::new(channel),
        );

        let result = usecase.run().await.unwrap();
        assert_eq!(result.scanned, 2);
        assert_eq!(result.revoked, 2);
        assert_eq!(result.remove_failed, 0);
    }

    #[tokio::test]
    async fn one_failed_removal_does_not_abort_the_batch() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expired()
            .returning(|_| Ok(vec![expired_user(1), expired_user(2)]));
        user_repo
            .expect_revoke_subscription()
            .times(2)
            .returning(|_| Ok(()));

        let mut channel = MockChannelGateway::new();
        channel.expect_remove_member().returning(|_, user_id| {
            if user_id == 1 {
                Err(anyhow!("user already left"))
            } else {
                Ok(())
            }
        });
        channel.expect_send_text().returning(|_, _| Ok(()));

        let usecase = RevokeExpiredSubscriptionsUseCase::new(
            Arc::new(user_repo),
            Arc::new(channel_setting()),
            Arc::new(channel),
        );

        let result = usecase.run().await.unwrap();
        assert_eq!(result.revoked, 2);
        assert_eq!(result.remove_failed, 1);
    }

    #[tokio::test]
    async fn skips_the_run_when_no_channel_is_configured() {
        let mut setting_repo = MockSettingRepository::new();
        setting_repo.expect_get().returning(|_| Ok(Some(String::new())));

        // No user repo or gateway expectations: nothing may be touched.
        let usecase = RevokeExpiredSubscriptionsUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(setting_repo),
            Arc::new(MockChannelGateway::new()),
        );

        let result = usecase.run().await.unwrap();
        assert_eq!(result.scanned, 0);
        assert_eq!(result.revoked, 0);
    }

    #[tokio::test]
    async fn notify_failures_are_counted_but_never_fatal() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expired()
            .returning(|_| Ok(vec![expired_user(1)]));
        user_repo
            .expect_revoke_subscription()
            .times(1)
            .returning(|_| Ok(()));

        let mut channel = MockChannelGateway::new();
        channel.expect_remove_member().returning(|_, _| Ok(()));
        channel
            .expect_send_text()
            .returning(|_, _| Err(anyhow!("bot was blocked by the user")));

        let usecase = RevokeExpiredSubscriptionsUseCase::new(
            Arc::new(user_repo),
            Arc::new(channel_setting()),
            Arc::new(channel),
        );

        let result = usecase.run().await.unwrap();
        assert_eq!(result.revoked, 1);
        assert_eq!(result.notify_failed, 1);
    }
}
