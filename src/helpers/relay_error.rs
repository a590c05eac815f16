use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::helpers::ical_parser::IcalParseError;

/// Failures of an outbound call. None of these leave the process, handlers log them and
/// answer with a fixed message.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}: {body}")]
    UpstreamRejected {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("{url} answered with a body that is not JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("calendar feed is malformed: {0}")]
    Calendar(#[from] IcalParseError),

    #[error("cannot format date {0:?}")]
    InvalidDate(String),
}

/// JSON error body shared by every endpoint.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
