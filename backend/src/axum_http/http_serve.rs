use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use infra::{
    db::postgres::postgres_connection::PgPool, telegram::client::TelegramChannelClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPool>) -> Result<()> {
    let channel = Arc::new(TelegramChannelClient::new(&config.telegram.bot_token)?);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/purchases",
            routers::purchases::routes(Arc::clone(&db_pool), Arc::clone(&channel)),
        )
        .nest(
            "/api/v1/memberships",
            routers::memberships::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/admin/tariffs",
            routers::tariffs::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/admin/promo-codes",
            routers::promos::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/admin/settings",
            routers::settings::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/admin/stats",
            routers::stats::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/admin/broadcast",
            routers::broadcast::routes(Arc::clone(&db_pool), Arc::clone(&channel)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");
        sigterm.recv().await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
