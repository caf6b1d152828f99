use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::AdminAuth;
use crate::axum_http::error_responses::AppError;
use crate::usecases::broadcast::BroadcastUseCase;
use domain::value_objects::broadcast::BroadcastMessage;
use infra::{
    db::{postgres::postgres_connection::PgPool, repositories::users::UserPostgres},
    telegram::client::TelegramChannelClient,
};

type BroadcastState = Arc<BroadcastUseCase<UserPostgres, TelegramChannelClient>>;

pub fn routes(db_pool: Arc<PgPool>, channel: Arc<TelegramChannelClient>) -> Router {
    let broadcast_usecase =
        BroadcastUseCase::new(Arc::new(UserPostgres::new(Arc::clone(&db_pool))), channel);

    Router::new()
        .route("/", post(broadcast))
        .with_state(Arc::new(broadcast_usecase))
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub text: String,
    pub photo_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub queued: usize,
}

pub async fn broadcast(
    State(broadcast_usecase): State<BroadcastState>,
    admin: AdminAuth,
    Json(payload): Json<BroadcastRequest>,
) -> Result<(StatusCode, Json<BroadcastResponse>), AppError> {
    info!(admin_id = admin.admin_id, "broadcast: requested");

    let queued = broadcast_usecase
        .broadcast(BroadcastMessage {
            text: payload.text,
            photo_id: payload.photo_id,
        })
        .await?;

    Ok((StatusCode::ACCEPTED, Json(BroadcastResponse { queued })))
}
