//! Defines the endpoint for the current month's income/expense summary.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState,
    response::internal_error,
    transaction::{TransactionStore, TransactionType, store::TypeTotal},
    window::month_window,
};

/// The state needed to compute the summary.
#[derive(Clone)]
pub struct SummaryState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone the current month is taken in.
    pub reporting_offset: UtcOffset,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
        }
    }
}

/// The response body for the summary endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The sum of expense amounts in the current month.
    pub total_expenses: f64,
    /// The sum of income amounts in the current month.
    pub total_income: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
    /// The number of transactions (both types) in the current month.
    pub transaction_count: u64,
    /// Month-over-month change. Comparing against the prior month is not
    /// implemented, so this is always reported as zero.
    pub monthly_change: f64,
    /// A human-readable description of the outcome.
    pub message: String,
}

/// A route handler for the current month's totals.
///
/// The month window is taken in the fixed reporting timezone, independent of
/// the host timezone.
pub async fn summary_endpoint(State(state): State<SummaryState>) -> Response {
    let window = month_window(OffsetDateTime::now_utc(), state.reporting_offset, 0);

    match state.transaction_store.totals_by_type(window).await {
        Ok(totals) => Json(build_summary(&totals)).into_response(),
        Err(error) => {
            tracing::error!("Could not aggregate the monthly summary: {error}");
            internal_error("Failed to fetch summary data")
        }
    }
}

fn build_summary(totals: &[TypeTotal]) -> SummaryResponse {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut transaction_count = 0;

    for total in totals {
        match total.transaction_type {
            TransactionType::Income => total_income = total.total,
            TransactionType::Expense => total_expenses = total.total,
        }
        transaction_count += total.count;
    }

    SummaryResponse {
        success: true,
        total_expenses,
        total_income,
        balance: total_income - total_expenses,
        transaction_count,
        monthly_change: 0.0,
        message: "Summary data fetched successfully".to_owned(),
    }
}
