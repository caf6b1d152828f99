use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use domain::repositories::{channel::ChannelGateway, users::UserRepository};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// Reminders go out this many days before expiry, most distant first.
const REMINDER_THRESHOLDS_DAYS: [i64; 2] = [3, 1];

const INTER_USER_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default)]
pub struct ReminderSweepResult {
    pub notified: usize,
    pub failed: usize,
}

/// Daily fire-and-forget reminders ahead of expiry. Each threshold
/// covers the half-open window `(now + (N-1)d, now + Nd]`, so an end
/// date lands in exactly one bucket and a user exactly N days out gets
/// exactly the N-day reminder. Never touches revocation.
pub struct RemindExpiringSubscriptionsUseCase {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    channel: Arc<dyn ChannelGateway + Send + Sync>,
}

impl RemindExpiringSubscriptionsUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        channel: Arc<dyn ChannelGateway + Send + Sync>,
    ) -> Self {
        Self { user_repo, channel }
    }

    pub async fn run(&self) -> Result<ReminderSweepResult> {
        let now = Utc::now();
        let mut result = ReminderSweepResult::default();

        for days_left in REMINDER_THRESHOLDS_DAYS {
            let after = now + ChronoDuration::days(days_left - 1);
            let until = now + ChronoDuration::days(days_left);

            let users = self.user_repo.list_expiring_between(after, until).await?;
            info!(
                days_left,
                count = users.len(),
                "reminder_sweep: users in expiry window"
            );

            let text = reminder_text(days_left);
            for user in users {
                match self.channel.send_text(user.id, &text).await {
                    Ok(()) => result.notified += 1,
                    Err(err) => {
                        warn!(
                            user_id = user.id,
                            days_left,
                            error = ?err,
                            "reminder_sweep: failed to deliver reminder"
                        );
                        result.failed += 1;
                    }
                }

                tokio::time::sleep(INTER_USER_DELAY).await;
            }
        }

        info!(
            notified = result.notified,
            failed = result.failed,
            "reminder_sweep: completed"
        );

        Ok(result)
    }
}

fn reminder_text(days_left: i64) -> String {
    if days_left == 1 {
        "Your subscription expires tomorrow. Renew it now so your access is not interrupted."
            .to_string()
    } else {
        format!(
            "Reminder: your subscription expires in {days_left} days. \
             Renew it in the payment menu to keep your access."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{DateTime, Utc};
    use domain::entities::users::UserEntity;
    use domain::repositories::{channel::MockChannelGateway, users::MockUserRepository};

    fn user(id: i64, end: DateTime<Utc>) -> UserEntity {
        UserEntity {
            id,
            username: None,
            subscription_end: Some(end),
            created_at: Utc::now() - ChronoDuration::days(60),
        }
    }

    fn ends_days_ahead(instant: DateTime<Utc>, days: i64) -> bool {
        let delta = instant - (Utc::now() + ChronoDuration::days(days));
        delta.num_seconds().abs() < 5
    }

    #[tokio::test]
    async fn a_user_exactly_three_days_out_gets_only_the_three_day_reminder() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expiring_between()
            .withf(|after, until| {
                *until - *after == ChronoDuration::days(1) && ends_days_ahead(*until, 3)
            })
            .times(1)
            .returning(|_, until| Ok(vec![user(42, until)]));
        user_repo
            .expect_list_expiring_between()
            .withf(|_, until| ends_days_ahead(*until, 1))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let mut channel = MockChannelGateway::new();
        channel
            .expect_send_text()
            .withf(|user_id, text| *user_id == 42 && text.contains("3 days"))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase =
            RemindExpiringSubscriptionsUseCase::new(Arc::new(user_repo), Arc::new(channel));

        let result = usecase.run().await.unwrap();
        assert_eq!(result.notified, 1);
        assert_eq!(result.failed, 0);
    }

    #[tokio::test]
    async fn the_one_day_reminder_warns_about_tomorrow() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expiring_between()
            .withf(|_, until| ends_days_ahead(*until, 3))
            .returning(|_, _| Ok(vec![]));
        user_repo
            .expect_list_expiring_between()
            .withf(|_, until| ends_days_ahead(*until, 1))
            .returning(|_, until| Ok(vec![user(7, until)]));

        let mut channel = MockChannelGateway::new();
        channel
            .expect_send_text()
            .withf(|user_id, text| *user_id == 7 && text.contains("tomorrow"))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase =
            RemindExpiringSubscriptionsUseCase::new(Arc::new(user_repo), Arc::new(channel));

        let result = usecase.run().await.unwrap();
        assert_eq!(result.notified, 1);
    }

    #[tokio::test]
    async fn delivery_failures_are_swallowed_and_counted() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_list_expiring_between()
            .returning(|_, until| Ok(vec![user(1, until)]));

        let mut channel = MockChannelGateway::new();
        channel
            .expect_send_text()
            .returning(|_, _| Err(anyhow!("bot was blocked by the user")));

        let usecase =
            RemindExpiringSubscriptionsUseCase::new(Arc::new(user_repo), Arc::new(channel));

        let result = usecase.run().await.unwrap();
        assert_eq!(result.notified, 0);
        assert_eq!(result.failed, 2);
    }
}
