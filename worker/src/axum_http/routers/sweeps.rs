use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::error;

use crate::{
    config::config_model::DotEnvyConfig,
    usecases::{
        remind_expiring::RemindExpiringSubscriptionsUseCase,
        revoke_expired::RevokeExpiredSubscriptionsUseCase,
    },
};

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_WORKER/internal/v1/sweeps/revoke" \
//     -H "Authorization: Bearer $SERVICE_TOKEN"

#[derive(Clone)]
pub struct SweepRouteState {
    config: Arc<DotEnvyConfig>,
    revoke_usecase: Arc<RevokeExpiredSubscriptionsUseCase>,
    remind_usecase: Arc<RemindExpiringSubscriptionsUseCase>,
}

pub fn routes(
    config: Arc<DotEnvyConfig>,
    revoke_usecase: Arc<RevokeExpiredSubscriptionsUseCase>,
    remind_usecase: Arc<RemindExpiringSubscriptionsUseCase>,
) -> Router {
    Router::new()
        .route("/revoke", post(run_revoke_sweep))
        .route("/remind", post(run_reminder_sweep))
        .with_state(SweepRouteState {
            config,
            revoke_usecase,
            remind_usecase,
        })
}

#[derive(Debug, Serialize)]
pub struct RevokeSweepResponse {
    pub scanned: usize,
    pub revoked: usize,
    pub remove_failed: usize,
    pub notify_failed: usize,
}

#[derive(Debug, Serialize)]
pub struct ReminderSweepResponse {
    pub notified: usize,
    pub failed: usize,
}

pub async fn run_revoke_sweep(State(state): State<SweepRouteState>, headers: HeaderMap) -> Response {
    if let Err(status) = authorize_bearer(&headers, &state.config.access.service_token) {
        return (status, "unauthorized").into_response();
    }

    match state.revoke_usecase.run().await {
        Ok(result) => Json(RevokeSweepResponse {
            scanned: result.scanned,
            revoked: result.revoked,
            remove_failed: result.remove_failed,
            notify_failed: result.notify_failed,
        })
        .into_response(),
        Err(err) => {
            error!(error = ?err, "sweeps: revoke sweep failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "revoke sweep failed").into_response()
        }
    }
}

pub async fn run_reminder_sweep(
    State(state): State<SweepRouteState>,
    headers: HeaderMap,
) -> Response {
    if let Err(status) = authorize_bearer(&headers, &state.config.access.service_token) {
        return (status, "unauthorized").into_response();
    }

    match state.remind_usecase.run().await {
        Ok(result) => Json(ReminderSweepResponse {
            notified: result.notified,
            failed: result.failed,
        })
        .into_response(),
        Err(err) => {
            error!(error = ?err, "sweeps: reminder sweep failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "reminder sweep failed").into_response()
        }
    }
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
