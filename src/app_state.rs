//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use time::UtcOffset;

use crate::{
    pagination::PaginationConfig, transaction::TransactionStore, window::REPORTING_OFFSET,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store holding the transaction collection.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The fixed civil timezone used for date-only inputs and report windows.
    pub reporting_offset: UtcOffset,

    /// The config that controls how transaction lists are paged.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] around a transaction store.
    ///
    /// Reports use the fixed [REPORTING_OFFSET] and lists use the default
    /// [PaginationConfig].
    pub fn new(transaction_store: Arc<dyn TransactionStore>) -> Self {
        Self {
            transaction_store,
            reporting_offset: REPORTING_OFFSET,
            pagination_config: PaginationConfig::default(),
        }
    }
}
