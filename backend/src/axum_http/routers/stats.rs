use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::auth::AdminAuth;
use crate::axum_http::error_responses::AppError;
use crate::usecases::stats::{BotStats, StatsUseCase};
use infra::db::{
    postgres::postgres_connection::PgPool,
    repositories::{payments::PaymentPostgres, users::UserPostgres},
};

type StatsState = Arc<StatsUseCase<UserPostgres, PaymentPostgres>>;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let stats_usecase = StatsUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/", get(overview))
        .with_state(Arc::new(stats_usecase))
}

pub async fn overview(
    State(stats_usecase): State<StatsState>,
    _admin: AdminAuth,
) -> Result<Json<BotStats>, AppError> {
    let stats = stats_usecase.overview().await?;

    Ok(Json(stats))
}
