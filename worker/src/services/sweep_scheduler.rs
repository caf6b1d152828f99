use crate::usecases::{
    remind_expiring::RemindExpiringSubscriptionsUseCase,
    revoke_expired::RevokeExpiredSubscriptionsUseCase,
};
use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

pub async fn run_revoke_loop(
    usecase: Arc<RevokeExpiredSubscriptionsUseCase>,
    interval_secs: u64,
) -> Result<()> {
    info!(interval_secs, "Revoke sweep loop started");

    loop {
        if let Err(e) = usecase.run().await {
            error!("Error while running revoke sweep: {}", e);
        }

        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
    }
}

pub async fn run_reminder_loop(
    usecase: Arc<RemindExpiringSubscriptionsUseCase>,
    hour_utc: u32,
) -> Result<()> {
    info!(hour_utc, "Reminder sweep loop started");

    loop {
        let wait = until_next_run(Utc::now(), hour_utc);
        info!(
            seconds = wait.as_secs(),
            "Reminder sweep sleeping until next run"
        );
        tokio::time::sleep(wait).await;

        if let Err(e) = usecase.run().await {
            error!("Error while running reminder sweep: {}", e);
        }
    }
}

fn until_next_run(now: DateTime<Utc>, hour_utc: u32) -> Duration {
    let fallback = Duration::from_secs(60 * 60 * 24);

    let Some(today_run) = now.date_naive().and_hms_opt(hour_utc, 0, 0) else {
        return fallback;
    };
    let today_run = today_run.and_utc();

    let next_run = if today_run > now {
        today_run
    } else {
        today_run + ChronoDuration::days(1)
    };

    (next_run - now).to_std().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn runs_later_today_when_the_hour_is_still_ahead() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 8, 30, 0).unwrap();
        let wait = until_next_run(now, 10);
        assert_eq!(wait, Duration::from_secs(90 * 60));
    }

    #[test]
    fn rolls_over_to_tomorrow_once_the_hour_has_passed() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 10, 0, 1).unwrap();
        let wait = until_next_run(now, 10);
        assert_eq!(wait, Duration::from_secs(24 * 60 * 60 - 1));
    }
}
