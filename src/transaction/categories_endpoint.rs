//! Defines the endpoint for the current month's expense breakdown by category.

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
    transaction::TransactionStore,
    window::month_window,
};

/// The state needed to compute the category breakdown.
#[derive(Clone)]
pub struct CategoriesState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone the current month is taken in.
    pub reporting_offset: UtcOffset,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
        }
    }
}

/// One category's expense total.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    /// The category label.
    pub name: String,
    /// The sum of expense amounts for this category in the current month.
    pub value: f64,
}

/// The response body for the category breakdown endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Categories with expenses this month, largest total first. Categories
    /// with no expenses are absent; there is no zero-fill here.
    pub data: Vec<CategoryPoint>,
    /// A human-readable description of the outcome.
    pub message: String,
}

/// A route handler for the current month's expense breakdown by category.
pub async fn categories_endpoint(State(state): State<CategoriesState>) -> Response {
    let window = month_window(OffsetDateTime::now_utc(), state.reporting_offset, 0);

    match state
        .transaction_store
        .expense_totals_by_category(window)
        .await
    {
        Ok(totals) => Json(CategoriesResponse {
            success: true,
            data: totals
                .into_iter()
                .map(|total| CategoryPoint {
                    name: total.category,
                    value: total.total,
                })
                .collect(),
            message: "Category data fetched successfully".to_owned(),
        })
        .into_response(),
        Err(error) => {
            tracing::error!("Could not aggregate the category breakdown: {error}");
            internal_error("Failed to fetch category data")
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::Date;

    use crate::{
        endpoints,
        test_utils::{local_today, months_back_date, test_server, transaction_json},
    };

    use super::CategoriesResponse;

    async fn create_expense(
        server: &axum_test::TestServer,
        category: &str,
        amount: f64,
        date: Date,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json("spend", amount, category, date, "expense"))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn an_empty_month_has_no_categories() {
        let server = test_server();

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status(StatusCode::OK);
        let body = response.json::<CategoriesResponse>();
        assert!(body.success);
        assert!(body.data.is_empty());
        assert_eq!(body.message, "Category data fetched successfully");
    }

    #[tokio::test]
    async fn groups_and_sorts_by_summed_amount() {
        let server = test_server();
        create_expense(&server, "Food & Dining", 150.0, local_today()).await;
        create_expense(&server, "Food & Dining", 50.0, local_today()).await;
        create_expense(&server, "Transportation", 300.0, local_today()).await;
        create_expense(&server, "Entertainment", 120.0, local_today()).await;

        let body = server
            .get(endpoints::CATEGORIES)
            .await
            .json::<CategoriesResponse>();

        let got: Vec<(&str, f64)> = body
            .data
            .iter()
            .map(|point| (point.name.as_str(), point.value))
            .collect();
        assert_eq!(
            got,
            [
                ("Transportation", 300.0),
                ("Food & Dining", 200.0),
                ("Entertainment", 120.0),
            ]
        );
    }

    #[tokio::test]
    async fn income_is_not_part_of_the_breakdown() {
        let server = test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json(
                "Salary",
                5000.0,
                "Income",
                local_today(),
                "income",
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let body = server
            .get(endpoints::CATEGORIES)
            .await
            .json::<CategoriesResponse>();

        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn expenses_from_other_months_are_excluded() {
        let server = test_server();
        create_expense(&server, "Travel", 900.0, months_back_date(1)).await;

        let body = server
            .get(endpoints::CATEGORIES)
            .await
            .json::<CategoriesResponse>();

        assert!(body.data.is_empty());
    }
}
