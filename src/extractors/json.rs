//! JSON body extractor that reports shape errors as [`AppError`] instead of axum's plain-text rejection.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// Deserialized request body. Missing or mistyped fields become `Validation`;
/// unparsable JSON or a wrong content type become `BadRequest`,
/// and a body over the size limit becomes `PayloadTooLarge`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(JsonRejection::JsonDataError(e)) => Err(AppError::Validation(e.body_text())),
            Err(other) => Err(AppError::from_body_rejection(other.status(), other.body_text())),
        }
    }
}
