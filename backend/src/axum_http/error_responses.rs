use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::usecases::{
    broadcast::BroadcastError, catalog::CatalogError, promos::PromoAdminError,
    settings::SettingsError, stats::StatsError,
};
use application::usecases::{checkout::CheckoutError, memberships::MembershipError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(_) => {
                // Don't leak internal error detail to clients
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::TariffNotFound => AppError::NotFound("tariff not found".to_string()),
            CheckoutError::InvalidReference(msg) => AppError::BadRequest(msg),
            CheckoutError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<MembershipError> for AppError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::Validation(msg) => AppError::BadRequest(msg),
            MembershipError::UserNotFound => AppError::NotFound("user not found".to_string()),
            MembershipError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::TariffNotFound => AppError::NotFound("tariff not found".to_string()),
            CatalogError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<PromoAdminError> for AppError {
    fn from(err: PromoAdminError) -> Self {
        match err {
            PromoAdminError::Validation(msg) => AppError::BadRequest(msg),
            PromoAdminError::DuplicateCode => {
                AppError::Conflict("promo code already exists".to_string())
            }
            PromoAdminError::PromoNotFound => {
                AppError::NotFound("promo code not found".to_string())
            }
            PromoAdminError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::UnknownKey(key) => {
                AppError::NotFound(format!("unknown setting key: {key}"))
            }
            SettingsError::Validation(msg) => AppError::BadRequest(msg),
            SettingsError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<BroadcastError> for AppError {
    fn from(err: BroadcastError) -> Self {
        match err {
            BroadcastError::Validation(msg) => AppError::BadRequest(msg),
            BroadcastError::Internal(err) => AppError::Internal(err),
        }
    }
}
