//! Defines the app level error type and its conversion to JSON failure responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::message_response;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One of the five transaction fields was missing or blank in the request
    /// body. Presence is checked before any other validation rule.
    #[error("All fields are required")]
    MissingFields,

    /// The transaction amount was zero or negative.
    ///
    /// The direction of a transaction is carried by its type, never by the
    /// sign of the amount.
    #[error("Amount must be greater than 0")]
    InvalidAmount,

    /// The transaction type was not one of the two allowed values.
    #[error("Type must be either income or expense")]
    InvalidTransactionType,

    /// The transaction date could not be parsed as a calendar date.
    #[error("Invalid date")]
    InvalidDate,

    /// The transaction ID in the request path is not a well-formed ObjectId.
    ///
    /// Malformed IDs are a client error (400), distinct from well-formed IDs
    /// that match no document (404).
    #[error("Invalid transaction ID")]
    InvalidTransactionId,

    /// A well-formed transaction ID matched no document in the collection.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// An unhandled/unexpected database error.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general message indicating an internal server error.
    #[error("an unexpected database error occurred: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for Error {
    fn from(error: mongodb::error::Error) -> Self {
        tracing::error!("an unhandled database error occurred: {}", error);
        Error::Database(error.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MissingFields
            | Error::InvalidAmount
            | Error::InvalidTransactionType
            | Error::InvalidDate
            | Error::InvalidTransactionId => {
                message_response(StatusCode::BAD_REQUEST, false, &self.to_string())
            }
            Error::TransactionNotFound => {
                message_response(StatusCode::NOT_FOUND, false, &self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                message_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    false,
                    "Something went wrong",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn validation_errors_map_to_bad_request() {
        for error in [
            Error::MissingFields,
            Error::InvalidAmount,
            Error::InvalidTransactionType,
            Error::InvalidDate,
            Error::InvalidTransactionId,
        ] {
            let response = error.into_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::TransactionNotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_maps_to_500() {
        let response = Error::Database("connection reset".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
