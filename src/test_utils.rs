//! Test helpers: an in-memory transaction store that mirrors the MongoDB
//! store's filter, sort and aggregation semantics, plus builders for wiring
//! endpoint tests through a [axum_test::TestServer].

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum_test::TestServer;
use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error, build_router,
    transaction::{
        CategoryTotal, MonthlyTotal, PageRequest, Transaction, TransactionFilter,
        TransactionPage, TransactionStore, TransactionType, TypeTotal, ValidTransaction,
    },
    window::{REPORTING_OFFSET, day_start, month_number, shift_months_back},
};

/// An in-memory [TransactionStore] double.
///
/// Filtering, sorting, pagination and the three aggregations follow the same
/// semantics as [crate::transaction::MongoTransactionStore] so endpoint tests
/// exercise the full router without a database.
pub(crate) struct InMemoryTransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub(crate) fn new() -> Self {
        Self {
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Seed a transaction directly, bypassing validation and timestamping.
    pub(crate) fn insert(&self, transaction: Transaction) {
        self.transactions.write().unwrap().push(transaction);
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, transaction: ValidTransaction) -> Result<Transaction, Error> {
        let now = OffsetDateTime::now_utc();
        let transaction = Transaction {
            id: ObjectId::new(),
            description: transaction.description,
            amount: transaction.amount,
            category: transaction.category,
            date: transaction.date,
            transaction_type: transaction.transaction_type,
            created_at: now,
            updated_at: now,
        };

        self.insert(transaction.clone());

        Ok(transaction)
    }

    async fn update(&self, id: ObjectId, update: ValidTransaction) -> Result<(), Error> {
        let mut transactions = self.transactions.write().unwrap();

        let transaction = transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)
            .ok_or(Error::TransactionNotFound)?;

        transaction.description = update.description;
        transaction.amount = update.amount;
        transaction.category = update.category;
        transaction.date = update.date;
        transaction.transaction_type = update.transaction_type;
        transaction.updated_at = OffsetDateTime::now_utc();

        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), Error> {
        let mut transactions = self.transactions.write().unwrap();

        let index = transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(Error::TransactionNotFound)?;
        transactions.remove(index);

        Ok(())
    }

    async fn list(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        let transactions = self.transactions.read().unwrap();

        let mut matches: Vec<Transaction> = transactions
            .iter()
            .filter(|transaction| {
                filter
                    .transaction_type
                    .is_none_or(|wanted| transaction.transaction_type == wanted)
                    && filter
                        .category
                        .as_deref()
                        .is_none_or(|wanted| transaction.category == wanted)
                    && filter.start.is_none_or(|start| transaction.date >= start)
                    && filter.end.is_none_or(|end| transaction.date <= end)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.created_at.cmp(&a.created_at))
        });

        let total = matches.len() as u64;
        let skip = ((page.page - 1) * page.page_size) as usize;
        let transactions = matches
            .into_iter()
            .skip(skip)
            .take(page.page_size as usize)
            .collect();

        Ok(TransactionPage {
            transactions,
            total,
        })
    }

    async fn totals_by_type(
        &self,
        range: crate::window::InstantRange,
    ) -> Result<Vec<TypeTotal>, Error> {
        let transactions = self.transactions.read().unwrap();

        let mut totals = Vec::new();
        for wanted in [TransactionType::Income, TransactionType::Expense] {
            let matching: Vec<&Transaction> = transactions
                .iter()
                .filter(|transaction| {
                    transaction.transaction_type == wanted
                        && transaction.date >= range.start
                        && transaction.date <= range.end
                })
                .collect();

            // Mirror $group: types with no documents simply produce no row.
            if !matching.is_empty() {
                totals.push(TypeTotal {
                    transaction_type: wanted,
                    total: matching.iter().map(|transaction| transaction.amount).sum(),
                    count: matching.len() as u64,
                });
            }
        }

        Ok(totals)
    }

    async fn monthly_expense_totals(
        &self,
        since: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<Vec<MonthlyTotal>, Error> {
        let transactions = self.transactions.read().unwrap();

        let mut totals: Vec<MonthlyTotal> = Vec::new();
        for transaction in transactions.iter() {
            if transaction.transaction_type != TransactionType::Expense
                || transaction.date < since
            {
                continue;
            }

            let local = transaction.date.to_offset(offset);
            let (year, month) = (local.year(), local.month());

            match totals
                .iter_mut()
                .find(|total| total.year == year && total.month == month)
            {
                Some(total) => total.expenses += transaction.amount,
                None => totals.push(MonthlyTotal {
                    year,
                    month,
                    expenses: transaction.amount,
                }),
            }
        }

        totals.sort_by_key(|total| (total.year, month_number(total.month)));

        Ok(totals)
    }

    async fn expense_totals_by_category(
        &self,
        range: crate::window::InstantRange,
    ) -> Result<Vec<CategoryTotal>, Error> {
        let transactions = self.transactions.read().unwrap();

        let mut totals: Vec<CategoryTotal> = Vec::new();
        for transaction in transactions.iter() {
            if transaction.transaction_type != TransactionType::Expense
                || transaction.date < range.start
                || transaction.date > range.end
            {
                continue;
            }

            match totals
                .iter_mut()
                .find(|total| total.category == transaction.category)
            {
                Some(total) => total.total += transaction.amount,
                None => totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: transaction.amount,
                }),
            }
        }

        totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap());

        Ok(totals)
    }
}

/// A test server over the full router and an empty in-memory store.
pub(crate) fn test_server() -> TestServer {
    test_server_with_store().0
}

/// A test server plus a handle to its store for seeding documents directly.
pub(crate) fn test_server_with_store() -> (TestServer, Arc<InMemoryTransactionStore>) {
    let store = Arc::new(InMemoryTransactionStore::new());
    let server = TestServer::new(build_router(AppState::new(store.clone())));

    (server, store)
}

/// The JSON body for creating or updating a transaction through the API.
pub(crate) fn transaction_json(
    description: &str,
    amount: f64,
    category: &str,
    date: Date,
    transaction_type: &str,
) -> Value {
    json!({
        "description": description,
        "amount": amount,
        "category": category,
        "date": date.to_string(),
        "type": transaction_type,
    })
}

/// A fully-specified transaction for seeding the in-memory store.
///
/// `created` orders transactions sharing a date: it is used directly as the
/// creation timestamp (seconds since the epoch).
pub(crate) fn transaction(
    description: &str,
    amount: f64,
    category: &str,
    date: Date,
    transaction_type: &str,
    created: i64,
) -> Transaction {
    let created_at = OffsetDateTime::from_unix_timestamp(created).unwrap();

    Transaction {
        id: ObjectId::new(),
        description: description.to_owned(),
        amount,
        category: category.to_owned(),
        date: day_start(date, REPORTING_OFFSET),
        transaction_type: TransactionType::parse(transaction_type).unwrap(),
        created_at,
        updated_at: created_at,
    }
}

/// Today's calendar date in the reporting timezone.
pub(crate) fn local_today() -> Date {
    OffsetDateTime::now_utc().to_offset(REPORTING_OFFSET).date()
}

/// The 15th of the month `months_back` months before the current one, in the
/// reporting timezone. Day 15 sidesteps month-length differences.
pub(crate) fn months_back_date(months_back: u32) -> Date {
    let today = local_today();
    let (year, month) = shift_months_back(today.year(), today.month(), months_back);

    Date::from_calendar_date(year, month, 15).unwrap()
}
