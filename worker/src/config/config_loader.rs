use anyhow::{Result, bail};

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = super::config_model::WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")
            .expect("SERVER_PORT_WORKER is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let telegram = super::config_model::Telegram {
        bot_token: std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN is invalid"),
    };

    let revoke_interval_secs = std::env::var("REVOKE_SWEEP_INTERVAL_SECS")
        .ok()
        .map(|raw| raw.parse::<u64>())
        .transpose()?
        .unwrap_or(3600);

    let reminder_hour_utc = std::env::var("REMINDER_SWEEP_HOUR_UTC")
        .ok()
        .map(|raw| raw.parse::<u32>())
        .transpose()?
        .unwrap_or(10);
    if reminder_hour_utc > 23 {
        bail!("REMINDER_SWEEP_HOUR_UTC must be between 0 and 23");
    }

    let access = super::config_model::ServiceAccess {
        service_token: std::env::var("SERVICE_TOKEN").expect("SERVICE_TOKEN is invalid"),
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        telegram,
        sweeps: super::config_model::SweepSchedule {
            revoke_interval_secs,
            reminder_hour_utc,
        },
        access,
    })
}
