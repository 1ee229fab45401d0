//! Defines the endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    AppState,
    response::{internal_error, message_response},
    transaction::{TransactionPayload, TransactionStore},
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone the transaction date is anchored in.
    pub reporting_offset: UtcOffset,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
        }
    }
}

/// The response body for a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    /// Always true on the success path.
    pub success: bool,
    /// A human-readable description of the outcome.
    pub message: String,
    /// The hex ObjectId assigned to the new transaction.
    pub id: String,
}

/// A route handler for creating a new transaction.
///
/// Responds 201 with the new transaction's ID, 400 with a field-specific
/// message when validation fails, or 500 when the store is unavailable.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return message_response(StatusCode::BAD_REQUEST, false, "Invalid request body");
    };

    let transaction = match payload.validate(state.reporting_offset) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_response(),
    };

    match state.transaction_store.create(transaction).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(CreateTransactionResponse {
                success: true,
                message: "Transaction created successfully".to_owned(),
                id: transaction.id.to_hex(),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            internal_error("Failed to create transaction")
        }
    }
}
