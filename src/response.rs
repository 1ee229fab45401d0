//! The JSON envelope shared by every route handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The minimal response envelope: a success flag and a human-readable message.
///
/// Successful report and list responses extend this shape with their data
/// fields; failure responses use it as-is.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Whether the request was handled successfully.
    pub success: bool,
    /// A human-readable description of the outcome.
    pub message: String,
}

/// Render a `{success, message}` envelope with the given status code.
pub(crate) fn message_response(status_code: StatusCode, success: bool, message: &str) -> Response {
    (
        status_code,
        Json(ApiMessage {
            success,
            message: message.to_owned(),
        }),
    )
        .into_response()
}

/// Render a generic 500 failure envelope.
///
/// `message` should be a generic description such as "Failed to fetch
/// transactions"; the underlying diagnostic belongs in the server log, not in
/// the response.
pub(crate) fn internal_error(message: &str) -> Response {
    message_response(StatusCode::INTERNAL_SERVER_ERROR, false, message)
}
