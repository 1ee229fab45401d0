//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, put},
};

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    response::message_response,
    transaction::{
        categories_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        list_transactions_endpoint, monthly_endpoint, summary_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SUMMARY, get(summary_endpoint))
        .route(endpoints::MONTHLY, get(monthly_endpoint))
        .route(endpoints::CATEGORIES, get(categories_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The JSON response for requests that match no route.
async fn get_404_not_found() -> Response {
    message_response(StatusCode::NOT_FOUND, false, "Not found")
}
