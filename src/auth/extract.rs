use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{auth::token::TokenService, error::AppError};

/// The authenticated caller, taken from `Authorization: Bearer <token>`.
///
/// Handlers that take this extractor are the protected routes; a missing
/// or invalid token short-circuits with 401 before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(header::AUTHORIZATION).ok_or_else(|| {
            tracing::warn!(path = %parts.uri.path(), "request without Authorization header");
            AppError::MissingToken
        })?;

        let token = header_value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::warn!(path = %parts.uri.path(), "malformed Authorization header");
                AppError::InvalidToken
            })?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token)?;

        Ok(Self {
            user_id: claims.user_id()?,
        })
    }
}
