use anyhow::Result;
use domain::repositories::{
    channel::ChannelGateway, settings::SettingRepository, users::UserRepository,
};
use infra::{
    db::{
        postgres::postgres_connection,
        repositories::{settings::SettingPostgres, users::UserPostgres},
    },
    telegram::client::TelegramChannelClient,
};
use std::sync::Arc;
use tracing::{error, info};
use worker::{
    axum_http, config,
    services::sweep_scheduler,
    usecases::{
        remind_expiring::RemindExpiringSubscriptionsUseCase,
        revoke_expired::RevokeExpiredSubscriptionsUseCase,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    // Repositories share the DB pool; both sweeps share the gateway.
    let user_repository: Arc<dyn UserRepository + Send + Sync> =
        Arc::new(UserPostgres::new(Arc::clone(&db_pool_arc)));

    let setting_repository: Arc<dyn SettingRepository + Send + Sync> =
        Arc::new(SettingPostgres::new(Arc::clone(&db_pool_arc)));

    let channel_gateway: Arc<dyn ChannelGateway + Send + Sync> =
        Arc::new(TelegramChannelClient::new(&dotenvy_env.telegram.bot_token)?);

    let revoke_usecase = Arc::new(RevokeExpiredSubscriptionsUseCase::new(
        Arc::clone(&user_repository),
        Arc::clone(&setting_repository),
        Arc::clone(&channel_gateway),
    ));

    let remind_usecase = Arc::new(RemindExpiringSubscriptionsUseCase::new(
        Arc::clone(&user_repository),
        Arc::clone(&channel_gateway),
    ));

    // Spawn background loops
    let revoke_loop = tokio::spawn(sweep_scheduler::run_revoke_loop(
        Arc::clone(&revoke_usecase),
        dotenvy_env.sweeps.revoke_interval_secs,
    ));

    let reminder_loop = tokio::spawn(sweep_scheduler::run_reminder_loop(
        Arc::clone(&remind_usecase),
        dotenvy_env.sweeps.reminder_hour_utc,
    ));

    let server_config = Arc::clone(&dotenvy_env);
    let sweep_server = tokio::spawn(async move {
        axum_http::http_serve::start(server_config, revoke_usecase, remind_usecase).await
    });

    tokio::select! {
        result = revoke_loop => result??,
        result = reminder_loop => result??,
        result = sweep_server => result??,
    };

    Ok(())
}
