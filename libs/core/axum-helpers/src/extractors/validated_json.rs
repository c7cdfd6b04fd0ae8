//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Malformed bodies are rejected through [`AppError::JsonExtractorRejection`]
/// and rule violations through [`AppError::ValidationError`], so both carry the
/// standard error body with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CalculateBmi {
///     #[validate(range(exclusive_min = 0.0))]
///     height: f64,
///     #[validate(range(exclusive_min = 0.0))]
///     weight: f64,
/// }
///
/// async fn calculate(ValidatedJson(input): ValidatedJson<CalculateBmi>) -> String {
///     format!("{}", input.weight / (input.height * input.height))
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
