//! Defines the endpoint for deleting a transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

use crate::{
    AppState, Error,
    response::{internal_error, message_response},
    transaction::TransactionStore,
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for deleting a transaction outright.
///
/// A malformed ID is a 400; a well-formed ID matching no transaction is a
/// 404. There is no soft delete.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Ok(id) = ObjectId::parse_str(&transaction_id) else {
        return Error::InvalidTransactionId.into_response();
    };

    match state.transaction_store.delete(id).await {
        Ok(()) => message_response(StatusCode::OK, true, "Transaction deleted successfully"),
        Err(Error::TransactionNotFound) => Error::TransactionNotFound.into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            internal_error("Failed to delete transaction")
        }
    }
}
