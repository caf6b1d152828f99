use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AdminAuth, ServiceAuth};
use crate::axum_http::error_responses::AppError;
use crate::usecases::settings::SettingsUseCase;
use infra::db::{
    postgres::postgres_connection::PgPool, repositories::settings::SettingPostgres,
};

type SettingsState = Arc<SettingsUseCase<SettingPostgres>>;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let settings_usecase =
        SettingsUseCase::new(Arc::new(SettingPostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/:key", get(get_setting).put(set_setting))
        .with_state(Arc::new(settings_usecase))
}

#[derive(Debug, Deserialize)]
pub struct SetSettingRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: Option<String>,
}

// Reads are service-level: the messaging layer renders the about text
// and welcome photo for ordinary users.
pub async fn get_setting(
    State(settings_usecase): State<SettingsState>,
    _auth: ServiceAuth,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, AppError> {
    let value = settings_usecase.get(&key).await?;

    Ok(Json(SettingResponse { key, value }))
}

pub async fn set_setting(
    State(settings_usecase): State<SettingsState>,
    _admin: AdminAuth,
    Path(key): Path<String>,
    Json(payload): Json<SetSettingRequest>,
) -> Result<StatusCode, AppError> {
    settings_usecase.set(&key, &payload.value).await?;

    Ok(StatusCode::NO_CONTENT)
}
