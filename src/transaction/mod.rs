//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated payload shared by the create
//!   and update paths
//! - The `TransactionStore` trait and its MongoDB implementation
//! - Route handlers for the transaction API endpoints

mod categories_endpoint;
mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod list_transactions_endpoint;
mod mongo;
mod monthly_endpoint;
mod store;
mod summary_endpoint;
mod update_transaction_endpoint;

pub use self::core::{
    MINIMUM_AMOUNT, Transaction, TransactionPayload, TransactionType, ValidTransaction,
};
pub use mongo::MongoTransactionStore;
pub use store::{
    CategoryTotal, MonthlyTotal, PageRequest, TransactionFilter, TransactionPage,
    TransactionStore, TypeTotal,
};

pub use categories_endpoint::categories_endpoint;
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use list_transactions_endpoint::list_transactions_endpoint;
pub use monthly_endpoint::monthly_endpoint;
pub use summary_endpoint::summary_endpoint;
pub use update_transaction_endpoint::update_transaction_endpoint;
