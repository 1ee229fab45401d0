//! Defines the endpoint for updating an existing transaction.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use time::UtcOffset;

use crate::{
    AppState, Error,
    response::{internal_error, message_response},
    transaction::{TransactionPayload, TransactionStore},
};

/// The state needed to update a transaction.
#[derive(Clone)]
pub struct UpdateTransactionState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone the transaction date is anchored in.
    pub reporting_offset: UtcOffset,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
        }
    }
}

/// A route handler for replacing the editable fields of a transaction.
///
/// The body is validated with the same rules as create. The body is checked
/// before the ID, so a malformed ID with an invalid body reports the body
/// problem first. A well-formed ID that matches no transaction is a 404.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return message_response(StatusCode::BAD_REQUEST, false, "Invalid request body");
    };

    let transaction = match payload.validate(state.reporting_offset) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_response(),
    };

    let Ok(id) = ObjectId::parse_str(&transaction_id) else {
        return Error::InvalidTransactionId.into_response();
    };

    match state.transaction_store.update(id, transaction).await {
        Ok(()) => message_response(StatusCode::OK, true, "Transaction updated successfully"),
        Err(Error::TransactionNotFound) => Error::TransactionNotFound.into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            internal_error("Failed to update transaction")
        }
    }
}
