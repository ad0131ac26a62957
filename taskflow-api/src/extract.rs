/// Request extractors
///
/// `ValidatedJson<T>` deserializes a JSON body and runs `validator` checks
/// before the handler sees it, so handlers only ever receive payloads that
/// satisfy every declared constraint.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// JSON body that has passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(Self(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        // Well-formed JSON with a missing field, wrong type or unknown enum literal
        JsonRejection::JsonDataError(err) => ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "body".to_string(),
            message: err.body_text(),
        }]),
        other => ApiError::BadRequest(other.body_text()),
    }
}
