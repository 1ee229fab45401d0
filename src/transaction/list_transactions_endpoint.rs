//! Defines the endpoint for listing transactions with filters and pagination.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    AppState,
    pagination::{Pagination, PaginationConfig, total_pages},
    response::internal_error,
    transaction::{
        Transaction, TransactionStore, TransactionType,
        core::parse_transaction_date,
        store::{PageRequest, TransactionFilter},
    },
    window::{day_end, day_start},
};

/// The state needed to list transactions.
#[derive(Clone)]
pub struct ListTransactionsState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone date-only filters are anchored in.
    pub reporting_offset: UtcOffset,
    /// The page defaults to apply when the request does not specify them.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the transaction list endpoint.
///
/// Everything arrives as an optional string; unusable values are ignored in
/// favour of defaults rather than rejected, matching the filter semantics
/// (an unknown `type` is simply not a filter).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    /// The page size.
    pub limit: Option<String>,
    /// Only include transactions of this type ("income" or "expense").
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
    /// Only include transactions on or after this "YYYY-MM-DD" day.
    pub start_date: Option<String>,
    /// Only include transactions on or before this "YYYY-MM-DD" day.
    pub end_date: Option<String>,
    /// The 1-based page number.
    pub page: Option<String>,
}

/// The response body for a successful list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    /// Always true on the success path.
    pub success: bool,
    /// A human-readable description of the outcome.
    pub message: String,
    /// The requested page of transactions.
    pub data: Vec<Transaction>,
    /// Where this page sits in the full result set.
    pub pagination: Pagination,
}

/// A route handler for listing transactions.
///
/// Sorts by date descending with the creation time as tie-break, pages
/// 1-based, and reports the total match count. A page beyond the last one
/// returns an empty data array, not an error.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(params): Query<ListTransactionsParams>,
) -> Response {
    let filter = TransactionFilter {
        transaction_type: params
            .transaction_type
            .as_deref()
            .and_then(TransactionType::parse),
        category: params.category.filter(|category| !category.is_empty()),
        start: params
            .start_date
            .as_deref()
            .and_then(|value| parse_transaction_date(value).ok())
            .map(|date| day_start(date, state.reporting_offset)),
        end: params
            .end_date
            .as_deref()
            .and_then(|value| parse_transaction_date(value).ok())
            .map(|date| day_end(date, state.reporting_offset)),
    };

    let page = PageRequest {
        page: parse_positive(params.page.as_deref())
            .unwrap_or(state.pagination_config.default_page),
        page_size: parse_positive(params.limit.as_deref())
            .unwrap_or(state.pagination_config.default_page_size),
    };

    match state.transaction_store.list(filter, page).await {
        Ok(result) => Json(ListTransactionsResponse {
            success: true,
            message: "Transactions fetched successfully".to_owned(),
            pagination: Pagination {
                page: page.page,
                page_size: page.page_size,
                total: result.total,
                total_pages: total_pages(result.total, page.page_size),
            },
            data: result.transactions,
        })
        .into_response(),
        Err(error) => {
            tracing::error!("Could not list transactions: {error}");
            internal_error("Failed to fetch transactions")
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value >= 1)
}
