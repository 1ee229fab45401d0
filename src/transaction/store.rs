//! Defines the transaction store trait and its query types.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use time::{Month, OffsetDateTime, UtcOffset};

use crate::{Error, window::InstantRange};

use super::core::{Transaction, TransactionType, ValidTransaction};

/// Handles persistence and aggregation of transaction documents.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction, assigning its ID and both timestamps.
    async fn create(&self, transaction: ValidTransaction) -> Result<Transaction, Error>;

    /// Replace the five editable fields of the transaction with `id` and
    /// refresh its update timestamp. The creation timestamp is untouched.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has `id`.
    async fn update(&self, id: ObjectId, transaction: ValidTransaction) -> Result<(), Error>;

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no transaction has `id`.
    async fn delete(&self, id: ObjectId) -> Result<(), Error>;

    /// Retrieve one page of transactions matching `filter`, sorted by date
    /// descending with the update timestamp as the tie-break, along with the
    /// total number of matches.
    async fn list(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error>;

    /// Sum amounts and count documents per transaction type within `range`.
    ///
    /// Types with no transactions in the range are simply absent.
    async fn totals_by_type(&self, range: InstantRange) -> Result<Vec<TypeTotal>, Error>;

    /// Sum expense amounts per civil (year, month) bucket for transactions
    /// dated at or after `since`, in chronological order.
    ///
    /// Buckets are taken on the wall clock obtained by shifting each stored
    /// instant into `offset`. Months with no expenses are absent; callers
    /// zero-fill.
    async fn monthly_expense_totals(
        &self,
        since: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<Vec<MonthlyTotal>, Error>;

    /// Sum expense amounts per category within `range`, largest total first.
    async fn expense_totals_by_category(
        &self,
        range: InstantRange,
    ) -> Result<Vec<CategoryTotal>, Error>;
}

/// Defines which transactions [TransactionStore::list] should return.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions with exactly this category label.
    pub category: Option<String>,
    /// Only include transactions dated at or after this instant.
    pub start: Option<OffsetDateTime>,
    /// Only include transactions dated at or before this instant.
    pub end: Option<OffsetDateTime>,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of transactions to return.
    pub page_size: u64,
}

/// One page of transactions plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// The transactions in this page.
    pub transactions: Vec<Transaction>,
    /// The total number of transactions matching the filter across all pages.
    pub total: u64,
}

/// The summed amount and document count for one transaction type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeTotal {
    /// The type the amounts were summed over.
    pub transaction_type: TransactionType,
    /// The sum of amounts for this type.
    pub total: f64,
    /// The number of transactions of this type.
    pub count: u64,
}

/// The summed expense amount for one civil calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    /// The civil year of the bucket.
    pub year: i32,
    /// The civil month of the bucket.
    pub month: Month,
    /// The sum of expense amounts in the bucket.
    pub expenses: f64,
}

/// The summed expense amount for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of expense amounts for this category.
    pub total: f64,
}
