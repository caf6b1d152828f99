use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::ServiceAuth;
use crate::axum_http::error_responses::AppError;
use application::usecases::checkout::CheckoutUseCase;
use domain::value_objects::quotes::PurchaseQuote;
use infra::{
    db::{
        postgres::postgres_connection::PgPool,
        repositories::{
            checkout::CheckoutPostgres, promo_codes::PromoCodePostgres,
            settings::SettingPostgres, tariffs::TariffPostgres, users::UserPostgres,
        },
    },
    telegram::client::TelegramChannelClient,
};

type PurchasesState = Arc<
    CheckoutUseCase<
        CheckoutPostgres,
        TariffPostgres,
        PromoCodePostgres,
        UserPostgres,
        SettingPostgres,
        TelegramChannelClient,
    >,
>;

pub fn routes(db_pool: Arc<PgPool>, channel: Arc<TelegramChannelClient>) -> Router {
    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(CheckoutPostgres::new(Arc::clone(&db_pool))),
        Arc::new(TariffPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PromoCodePostgres::new(Arc::clone(&db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SettingPostgres::new(Arc::clone(&db_pool))),
        channel,
    );

    Router::new()
        .route("/quote", post(quote))
        .route("/confirmations", post(confirm))
        .with_state(Arc::new(checkout_usecase))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub user_id: i64,
    pub username: Option<String>,
    pub tariff_id: i32,
    pub promo_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub reference: String,
    pub provider_payment_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub new_end_date: Option<DateTime<Utc>>,
    pub duplicate: bool,
}

pub async fn quote(
    State(checkout_usecase): State<PurchasesState>,
    _auth: ServiceAuth,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<PurchaseQuote>, AppError> {
    let quote = checkout_usecase
        .quote(
            payload.user_id,
            payload.username,
            payload.tariff_id,
            payload.promo_code.as_deref(),
        )
        .await?;

    Ok(Json(quote))
}

pub async fn confirm(
    State(checkout_usecase): State<PurchasesState>,
    _auth: ServiceAuth,
    Json(payload): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let confirmed = checkout_usecase
        .confirm(&payload.reference, &payload.provider_payment_id)
        .await?;

    Ok(Json(ConfirmResponse {
        new_end_date: confirmed.end_date,
        duplicate: confirmed.duplicate,
    }))
}
