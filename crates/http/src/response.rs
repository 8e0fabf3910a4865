use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use libris_cache::{DataSource, Fetched};
use serde::Serialize;

/// Tells clients whether a read was served from the cache or the database.
pub const X_DATA_SOURCE: HeaderName = HeaderName::from_static("x-data-source");

/// `200 OK` JSON response tagged with its [`DataSource`].
#[derive(Debug)]
pub struct Sourced<T>(pub Fetched<T>);

impl<T: Serialize> IntoResponse for Sourced<T> {
    fn into_response(self) -> Response {
        let Fetched { value, source } = self.0;
        ([(X_DATA_SOURCE, source_header(source))], Json(value)).into_response()
    }
}

fn source_header(source: DataSource) -> HeaderValue {
    HeaderValue::from_static(source.as_str())
}
