use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::{
    error::ServiceError,
    service::auth::{Caller, Role},
    state::AppState,
};

/// Resolves `Authorization: Bearer <token>` into the acting identity.
/// Handlers that take an `AuthUser` argument are protected; the request
/// never reaches them without a valid token.
pub struct AuthUser(pub Caller);

fn bearer_token(parts: &Parts) -> Result<&str, ServiceError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::unauthenticated("Authorization token is required"))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ServiceError::unauthenticated("Authorization token is required"))
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.auth().verify_token(token)?;
        Ok(AuthUser(Caller {
            account_id: claims.sub,
            role: claims.role,
        }))
    }
}

pub fn require_admin(caller: &Caller) -> Result<(), ServiceError> {
    if caller.role != Role::Admin {
        return Err(ServiceError::forbidden("Access denied"));
    }
    Ok(())
}
