use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AdminAuth, ServiceAuth};
use crate::axum_http::error_responses::AppError;
use crate::usecases::catalog::CatalogUseCase;
use domain::entities::tariffs::TariffEntity;
use infra::db::{postgres::postgres_connection::PgPool, repositories::tariffs::TariffPostgres};

type CatalogState = Arc<CatalogUseCase<TariffPostgres>>;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let catalog_usecase = CatalogUseCase::new(Arc::new(TariffPostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/", get(list_tariffs).post(create_tariff))
        .route("/:tariff_id", delete(delete_tariff))
        .with_state(Arc::new(catalog_usecase))
}

#[derive(Debug, Deserialize)]
pub struct CreateTariffRequest {
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
}

#[derive(Debug, Serialize)]
pub struct TariffResponse {
    pub id: i32,
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
}

#[derive(Debug, Serialize)]
pub struct CreatedTariffResponse {
    pub id: i32,
}

impl From<TariffEntity> for TariffResponse {
    fn from(tariff: TariffEntity) -> Self {
        Self {
            id: tariff.id,
            name: tariff.name,
            price_minor: tariff.price_minor,
            duration_days: tariff.duration_days,
        }
    }
}

pub async fn list_tariffs(
    State(catalog_usecase): State<CatalogState>,
    _auth: ServiceAuth,
) -> Result<Json<Vec<TariffResponse>>, AppError> {
    let tariffs = catalog_usecase.list_tariffs().await?;

    Ok(Json(tariffs.into_iter().map(TariffResponse::from).collect()))
}

pub async fn create_tariff(
    State(catalog_usecase): State<CatalogState>,
    _admin: AdminAuth,
    Json(payload): Json<CreateTariffRequest>,
) -> Result<(StatusCode, Json<CreatedTariffResponse>), AppError> {
    let id = catalog_usecase
        .create_tariff(&payload.name, payload.price_minor, payload.duration_days)
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedTariffResponse { id })))
}

pub async fn delete_tariff(
    State(catalog_usecase): State<CatalogState>,
    _admin: AdminAuth,
    Path(tariff_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    catalog_usecase.delete_tariff(tariff_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
