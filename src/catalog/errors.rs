use libris_db::{Entity, StoreError};
use libris_http::AppError;
use serde_json::json;

/// Map a store failure to the response for entity `E`.
pub fn store_error<E: Entity>(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::not_found(format!("{} not found", E::LABEL)),
        StoreError::Duplicate { constraint } => AppError::conflict(
            vec![json!({ "constraint": constraint })],
            format!("{} already exists", E::LABEL),
        ),
        StoreError::InvalidInput { message } | StoreError::Integrity { message } => {
            AppError::bad_request(message)
        }
        err @ StoreError::Database(_) => AppError::Internal(
            anyhow::Error::new(err).context(format!("{} store failure", E::COLLECTION)),
        ),
    }
}
