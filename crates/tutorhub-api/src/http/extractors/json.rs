//! JSON body extractor that runs declarative validation.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tutorhub_types::validation::collect_messages;
use validator::Validate;

use crate::http::error::AppError;

/// Deserializes the body like `axum::Json`, then applies the type's
/// `validator` rules. Either failure becomes a 400 `VALIDATION_ERROR`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::Validation(collect_messages(&errors).join("; ")))?;
        Ok(Self(value))
    }
}
