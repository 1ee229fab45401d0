//! Defines the endpoint for the trailing six-month expense trend.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::{Month, OffsetDateTime, UtcOffset};

use crate::{
    AppState,
    response::internal_error,
    transaction::{TransactionStore, store::MonthlyTotal},
    window::{month_abbrev, month_window, trailing_months},
};

/// The number of months in the expense trend, including the current month.
const TREND_MONTHS: u32 = 6;

/// The state needed to compute the monthly trend.
#[derive(Clone)]
pub struct MonthlyState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The civil timezone expense instants are bucketed in.
    pub reporting_offset: UtcOffset,
}

impl FromRef<AppState> for MonthlyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            reporting_offset: state.reporting_offset,
        }
    }
}

/// One month's expense total in the trend.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// The three-letter month label, e.g. "Mar".
    pub month: String,
    /// The sum of expense amounts in that month. Zero when there were none.
    pub expenses: f64,
}

/// The response body for the monthly trend endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Exactly six entries, oldest first, ending at the current month.
    pub data: Vec<MonthlyPoint>,
    /// A human-readable description of the outcome.
    pub message: String,
}

/// A route handler for the trailing six-month expense trend.
///
/// Months with no expenses are synthesized as zero-valued entries so the
/// result always holds exactly six entries, oldest to newest.
pub async fn monthly_endpoint(State(state): State<MonthlyState>) -> Response {
    let now = OffsetDateTime::now_utc();
    let since = month_window(now, state.reporting_offset, TREND_MONTHS - 1).start;

    match state
        .transaction_store
        .monthly_expense_totals(since, state.reporting_offset)
        .await
    {
        Ok(totals) => Json(MonthlyResponse {
            success: true,
            data: zero_fill(
                &totals,
                trailing_months(now, state.reporting_offset, TREND_MONTHS),
            ),
            message: "Monthly data fetched successfully".to_owned(),
        })
        .into_response(),
        Err(error) => {
            tracing::error!("Could not aggregate the monthly trend: {error}");
            internal_error("Failed to fetch monthly data")
        }
    }
}

/// Expand sparse month totals into one entry per requested month.
fn zero_fill(totals: &[MonthlyTotal], months: Vec<(i32, Month)>) -> Vec<MonthlyPoint> {
    months
        .into_iter()
        .map(|(year, month)| MonthlyPoint {
            month: month_abbrev(month).to_owned(),
            expenses: totals
                .iter()
                .find(|total| total.year == year && total.month == month)
                .map(|total| total.expenses)
                .unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::{Month, OffsetDateTime, macros::offset};

    use crate::{
        endpoints,
        test_utils::{local_today, months_back_date, test_server, transaction_json},
        transaction::store::MonthlyTotal,
        window::{REPORTING_OFFSET, month_abbrev, trailing_months},
    };

    use super::{MonthlyPoint, MonthlyResponse, zero_fill};

    #[test]
    fn zero_fill_synthesizes_missing_months() {
        let months = vec![
            (2023, Month::November),
            (2023, Month::December),
            (2024, Month::January),
        ];
        let totals = [MonthlyTotal {
            year: 2023,
            month: Month::December,
            expenses: 120.5,
        }];

        let got = zero_fill(&totals, months);

        let want = [
            MonthlyPoint {
                month: "Nov".to_owned(),
                expenses: 0.0,
            },
            MonthlyPoint {
                month: "Dec".to_owned(),
                expenses: 120.5,
            },
            MonthlyPoint {
                month: "Jan".to_owned(),
                expenses: 0.0,
            },
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn zero_fill_distinguishes_the_same_month_in_different_years() {
        let months = vec![(2024, Month::January)];
        let totals = [MonthlyTotal {
            year: 2023,
            month: Month::January,
            expenses: 99.0,
        }];

        let got = zero_fill(&totals, months);

        assert_eq!(got[0].expenses, 0.0);
    }

    #[tokio::test]
    async fn always_returns_exactly_six_months() {
        let server = test_server();

        let response = server.get(endpoints::MONTHLY).await;

        response.assert_status(StatusCode::OK);
        let body = response.json::<MonthlyResponse>();
        assert!(body.success);
        assert_eq!(body.data.len(), 6);
        assert!(body.data.iter().all(|point| point.expenses == 0.0));
        assert_eq!(body.message, "Monthly data fetched successfully");
    }

    #[tokio::test]
    async fn months_are_labelled_oldest_to_newest_ending_now() {
        let server = test_server();

        let body = server.get(endpoints::MONTHLY).await.json::<MonthlyResponse>();

        let want: Vec<&str> = trailing_months(OffsetDateTime::now_utc(), REPORTING_OFFSET, 6)
            .into_iter()
            .map(|(_, month)| month_abbrev(month))
            .collect();
        let got: Vec<&str> = body.data.iter().map(|point| point.month.as_str()).collect();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn sums_expenses_into_the_current_month_bucket() {
        let server = test_server();
        for amount in [150.0, 50.0] {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&transaction_json(
                    "Coffee",
                    amount,
                    "Food & Dining",
                    local_today(),
                    "expense",
                ))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body = server.get(endpoints::MONTHLY).await.json::<MonthlyResponse>();

        assert_eq!(body.data[5].expenses, 200.0);
        assert!(body.data[..5].iter().all(|point| point.expenses == 0.0));
    }

    #[tokio::test]
    async fn income_does_not_appear_in_the_trend() {
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

        let body = server.get(endpoints::MONTHLY).await.json::<MonthlyResponse>();

        assert!(body.data.iter().all(|point| point.expenses == 0.0));
    }

    #[tokio::test]
    async fn an_old_expense_lands_in_its_own_bucket() {
        let server = test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json(
                "Old groceries",
                300.0,
                "Shopping",
                months_back_date(3),
                "expense",
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let body = server.get(endpoints::MONTHLY).await.json::<MonthlyResponse>();

        // Oldest-first ordering puts three months ago at index 2 of 6.
        assert_eq!(body.data[2].expenses, 300.0);
        assert_eq!(body.data[5].expenses, 0.0);
    }

    #[tokio::test]
    async fn expenses_older_than_the_window_are_excluded() {
        let server = test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json(
                "Ancient history",
                300.0,
                "Shopping",
                months_back_date(6),
                "expense",
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let body = server.get(endpoints::MONTHLY).await.json::<MonthlyResponse>();

        assert!(body.data.iter().all(|point| point.expenses == 0.0));
    }

    #[test]
    fn the_trend_window_matches_the_fill_months() {
        // The aggregation window starts exactly at the oldest filled month,
        // so no bucket can be dropped or double-counted at the boundary.
        let now = OffsetDateTime::now_utc();
        let months = trailing_months(now, offset!(+5:30), 6);
        let window = crate::window::month_window(now, offset!(+5:30), 5);

        let oldest = months.first().unwrap();
        assert_eq!(
            (window.start.to_offset(offset!(+5:30)).year(), window.start.to_offset(offset!(+5:30)).month()),
            *oldest
        );
    }
}
