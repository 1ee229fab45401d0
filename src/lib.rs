//! Paisa is a personal finance tracker: a JSON API for recording income and
//! expense transactions and serving the summaries, monthly trends, and
//! category breakdowns that power a dashboard client.
//!
//! Transactions live in a single MongoDB collection. Date-only inputs and
//! report windows are interpreted in a fixed UTC+5:30 civil timezone,
//! independent of wherever the server happens to run.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod error;
mod logging;
mod pagination;
mod response;
mod routing;
#[cfg(test)]
mod test_utils;
mod transaction;
mod window;

pub use app_state::AppState;
pub use db::connect;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    CategoryTotal, MongoTransactionStore, MonthlyTotal, PageRequest, Transaction,
    TransactionFilter, TransactionPage, TransactionPayload, TransactionStore, TransactionType,
    TypeTotal, ValidTransaction,
};
pub use window::{InstantRange, REPORTING_OFFSET};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
