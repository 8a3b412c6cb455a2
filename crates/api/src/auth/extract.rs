use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Actor, Claims};
use crate::error::AppError;

/// Extractor for REST handlers that require a verified caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(AuthUser(Actor::from_claims(claims)?))
    }
}
