use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::config::config_loader;

const ADMIN_ID_HEADER: &str = "x-admin-id";

/// Proof that the request carries the shared service token. Every route
/// is called by the trusted messaging layer, never by end users
/// directly.
#[derive(Debug, Clone)]
pub struct ServiceAuth;

/// ServiceAuth plus an `x-admin-id` header naming one of the configured
/// administrators.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub admin_id: i64,
}

pub fn validate_bearer(auth_header: &str, expected_token: &str) -> Result<(), String> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| "Invalid Authorization header format".to_string())?;

    if token != expected_token {
        return Err("Invalid service token".to_string());
    }

    Ok(())
}

pub fn validate_admin_id(raw: &str, allowed: &[i64]) -> Result<i64, String> {
    let admin_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| "Invalid admin id header".to_string())?;

    if !allowed.contains(&admin_id) {
        return Err("Unknown admin id".to_string());
    }

    Ok(admin_id)
}

fn bearer_header(parts: &Parts) -> Result<&str, (StatusCode, String)> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            )
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for ServiceAuth
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let access = config_loader::get_access()
            .map_err(|e| (StatusCode::UNAUTHORIZED, format!("Unauthorized: {e}")))?;

        let auth_header = bearer_header(parts)?;
        validate_bearer(auth_header, &access.service_token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e))?;

        Ok(ServiceAuth)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let access = config_loader::get_access()
            .map_err(|e| (StatusCode::UNAUTHORIZED, format!("Unauthorized: {e}")))?;

        let auth_header = bearer_header(parts)?;
        validate_bearer(auth_header, &access.service_token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e))?;

        let admin_header = parts
            .headers
            .get(ADMIN_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or((
                StatusCode::FORBIDDEN,
                "Missing x-admin-id header".to_string(),
            ))?;

        let admin_id = validate_admin_id(admin_header, &access.admin_ids)
            .map_err(|e| (StatusCode::FORBIDDEN, e))?;

        Ok(AdminAuth { admin_id })
    }
}

#[cfg(test)]
mod tests;
