use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AdminAuth;
use crate::axum_http::error_responses::AppError;
use crate::usecases::promos::PromoAdminUseCase;
use domain::entities::promo_codes::PromoCodeEntity;
use infra::db::{
    postgres::postgres_connection::PgPool, repositories::promo_codes::PromoCodePostgres,
};

type PromosState = Arc<PromoAdminUseCase<PromoCodePostgres>>;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let promo_usecase =
        PromoAdminUseCase::new(Arc::new(PromoCodePostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/", get(list_promo_codes).post(create_promo_code))
        .route("/:promo_id/toggle", post(toggle_promo_code))
        .with_state(Arc::new(promo_usecase))
}

#[derive(Debug, Deserialize)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
}

#[derive(Debug, Serialize)]
pub struct PromoCodeResponse {
    pub id: i32,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub uses_count: i32,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedPromoCodeResponse {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct ToggledPromoCodeResponse {
    pub is_active: bool,
}

impl From<PromoCodeEntity> for PromoCodeResponse {
    fn from(promo: PromoCodeEntity) -> Self {
        Self {
            id: promo.id,
            code: promo.code,
            discount_percent: promo.discount_percent,
            max_uses: promo.max_uses,
            uses_count: promo.uses_count,
            is_active: promo.is_active,
        }
    }
}

pub async fn list_promo_codes(
    State(promo_usecase): State<PromosState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<PromoCodeResponse>>, AppError> {
    let promos = promo_usecase.list_promo_codes().await?;

    Ok(Json(promos.into_iter().map(PromoCodeResponse::from).collect()))
}

pub async fn create_promo_code(
    State(promo_usecase): State<PromosState>,
    _admin: AdminAuth,
    Json(payload): Json<CreatePromoCodeRequest>,
) -> Result<(StatusCode, Json<CreatedPromoCodeResponse>), AppError> {
    let id = promo_usecase
        .create_promo_code(&payload.code, payload.discount_percent, payload.max_uses)
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedPromoCodeResponse { id })))
}

pub async fn toggle_promo_code(
    State(promo_usecase): State<PromosState>,
    _admin: AdminAuth,
    Path(promo_id): Path<i32>,
) -> Result<Json<ToggledPromoCodeResponse>, AppError> {
    let is_active = promo_usecase.toggle_promo_code(promo_id).await?;

    Ok(Json(ToggledPromoCodeResponse { is_active }))
}
