//! Request extraction that reports failures in the [`AppError`] format.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::AppError;

/// JSON body whose binding failures become `400 Bad Request`.
///
/// Plain [`Json`] answers type mismatches with 422 and a plain-text body.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::bad_request(format!(
                "Invalid request payload: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Parse a path id. Only positive integers are ids.
pub fn parse_id(raw: &str, label: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(format!(
            "Invalid {} ID",
            label.to_lowercase()
        ))),
    }
}
