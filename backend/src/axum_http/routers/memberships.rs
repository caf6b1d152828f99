use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{AdminAuth, ServiceAuth};
use crate::axum_http::error_responses::AppError;
use application::usecases::memberships::MembershipUseCase;
use domain::value_objects::memberships::MembershipProfile;
use infra::db::{postgres::postgres_connection::PgPool, repositories::users::UserPostgres};

type MembershipsState = Arc<MembershipUseCase<UserPostgres>>;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let membership_usecase =
        MembershipUseCase::new(Arc::new(UserPostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/:user_id", get(profile))
        .route("/:user_id/extend", post(extend))
        .route("/:user_id/revoke", post(revoke))
        .with_state(Arc::new(membership_usecase))
}

#[derive(Debug, Deserialize)]
pub struct ExtendRequest {
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct ExtendResponse {
    pub new_end_date: DateTime<Utc>,
}

pub async fn profile(
    State(membership_usecase): State<MembershipsState>,
    _auth: ServiceAuth,
    Path(user_id): Path<i64>,
) -> Result<Json<MembershipProfile>, AppError> {
    let profile = membership_usecase.profile(user_id).await?;

    Ok(Json(profile))
}

pub async fn extend(
    State(membership_usecase): State<MembershipsState>,
    admin: AdminAuth,
    Path(user_id): Path<i64>,
    Json(payload): Json<ExtendRequest>,
) -> Result<Json<ExtendResponse>, AppError> {
    info!(
        admin_id = admin.admin_id,
        user_id,
        days = payload.days,
        "memberships: manual extension requested"
    );

    let new_end_date = membership_usecase.extend(user_id, payload.days).await?;

    Ok(Json(ExtendResponse { new_end_date }))
}

pub async fn revoke(
    State(membership_usecase): State<MembershipsState>,
    admin: AdminAuth,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    info!(
        admin_id = admin.admin_id,
        user_id, "memberships: manual revoke requested"
    );

    membership_usecase.revoke(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
