pub mod comments;
pub mod posts;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, Result};

/// JSON body that has been deserialized and validated. Both failures
/// surface as 400 in the usual `{"error": ...}` envelope.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "rejected request body");
            AppError::Validation(rejection.body_text())
        })?;

        value.validate().map_err(|errors| {
            tracing::warn!(%errors, "request body failed validation");
            AppError::Validation(errors.to_string())
        })?;

        Ok(Self(value))
    }
}

/// Path ids are positive 32-bit integers.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i64> {
    raw.parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .map(i64::from)
        .ok_or_else(|| {
            tracing::warn!(raw, kind, "invalid id in path");
            AppError::Validation(format!("invalid {kind} id"))
        })
}
