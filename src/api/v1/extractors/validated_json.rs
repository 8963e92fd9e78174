/*
 * Responsibility
 * - JSON body extraction + schema validation in one extractor
 * - Handlers receive the typed, already-validated value (no re-parsing)
 * - Failures answer 400 with a {field, message} list, never a process error
 */
use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, FieldError};

pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            // Undeserializable body: same 400 shape, one `body` entry.
            AppError::Validation(vec![FieldError {
                field: "body".to_string(),
                message: e.body_text(),
            }])
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
