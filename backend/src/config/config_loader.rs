use anyhow::{Ok, Result};

use super::config_model::{Access, DotEnvyConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = super::config_model::BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
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

    Ok(DotEnvyConfig {
        backend_server,
        database,
        telegram,
    })
}

pub fn get_access() -> Result<Access> {
    dotenvy::dotenv().ok();

    let admin_ids = std::env::var("ADMIN_IDS")
        .expect("ADMIN_IDS is invalid")
        .split(',')
        .map(|id| id.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<i64>, _>>()?;

    Ok(Access {
        service_token: std::env::var("SERVICE_TOKEN").expect("SERVICE_TOKEN is invalid"),
        admin_ids,
    })
}
