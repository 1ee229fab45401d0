//! MongoDB-backed implementation of the transaction store.
//!
//! Documents live in a single `transactions` collection. Mapping between
//! documents and the domain model is explicit and field-by-field; dates are
//! stored as BSON datetimes (millisecond precision) and the `id` field maps
//! to MongoDB's `_id` convention.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, DateTime, Document, doc, document::ValueAccessError, oid::ObjectId},
};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, window::InstantRange};

use super::{
    core::{Transaction, TransactionType, ValidTransaction},
    store::{
        CategoryTotal, MonthlyTotal, PageRequest, TransactionFilter, TransactionPage,
        TransactionStore, TypeTotal,
    },
};

/// The name of the collection holding transaction documents.
const COLLECTION: &str = "transactions";

/// Transaction storage and aggregation backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoTransactionStore {
    database: Database,
}

impl MongoTransactionStore {
    /// Create a new store reading and writing the `transactions` collection
    /// of `database`.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create the indexes used by the list and report queries.
    ///
    /// This method is idempotent, so it is safe to call on every startup.
    ///
    /// # Errors
    /// Returns an error if the index build fails.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "date": -1, "createdAt": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "type": 1, "date": 1 })
                .build(),
        ];

        self.collection().create_indexes(indexes).await?;

        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
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

        self.collection()
            .insert_one(transaction_to_document(&transaction))
            .await?;

        Ok(transaction)
    }

    async fn update(&self, id: ObjectId, transaction: ValidTransaction) -> Result<(), Error> {
        let update = doc! {
            "$set": {
                "description": transaction.description,
                "amount": transaction.amount,
                "category": transaction.category,
                "date": bson_datetime(transaction.date),
                "type": transaction.transaction_type.as_str(),
                "updatedAt": bson_datetime(OffsetDateTime::now_utc()),
            }
        };

        let result = self
            .collection()
            .update_one(doc! { "_id": id }, update)
            .await?;

        if result.matched_count == 0 {
            return Err(Error::TransactionNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), Error> {
        let result = self.collection().delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(Error::TransactionNotFound);
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        let query = filter_document(&filter);

        let total = self.collection().count_documents(query.clone()).await?;

        let cursor = self
            .collection()
            .find(query)
            .sort(doc! { "date": -1, "createdAt": -1 })
            .skip((page.page - 1) * page.page_size)
            .limit(page.page_size as i64)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        let transactions = documents
            .into_iter()
            .map(map_transaction_document)
            .collect::<Result<_, _>>()?;

        Ok(TransactionPage {
            transactions,
            total,
        })
    }

    async fn totals_by_type(&self, range: InstantRange) -> Result<Vec<TypeTotal>, Error> {
        let pipeline = vec![
            doc! {
                "$match": {
                    "date": {
                        "$gte": bson_datetime(range.start),
                        "$lte": bson_datetime(range.end),
                    },
                },
            },
            doc! {
                "$group": {
                    "_id": "$type",
                    "total": { "$sum": "$amount" },
                    "count": { "$sum": 1 },
                },
            },
        ];

        let documents: Vec<Document> = self
            .collection()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| {
                let transaction_type = TransactionType::parse(
                    document.get_str("_id").map_err(field_error)?,
                )
                .ok_or_else(|| {
                    Error::Database("aggregation returned an unknown transaction type".to_owned())
                })?;

                Ok(TypeTotal {
                    transaction_type,
                    total: numeric_field(&document, "total")?,
                    count: numeric_field(&document, "count")? as u64,
                })
            })
            .collect()
    }

    async fn monthly_expense_totals(
        &self,
        since: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<Vec<MonthlyTotal>, Error> {
        let pipeline = vec![
            doc! {
                "$match": {
                    "type": TransactionType::Expense.as_str(),
                    "date": { "$gte": bson_datetime(since) },
                },
            },
            // Shift each instant into the reporting timezone's wall clock so
            // $year/$month extract the civil month, not the UTC month.
            doc! {
                "$addFields": {
                    "localDate": { "$add": ["$date", offset_millis(offset)] },
                },
            },
            doc! {
                "$group": {
                    "_id": {
                        "year": { "$year": "$localDate" },
                        "month": { "$month": "$localDate" },
                    },
                    "expenses": { "$sum": "$amount" },
                },
            },
            doc! {
                "$sort": { "_id.year": 1, "_id.month": 1 },
            },
        ];

        let documents: Vec<Document> = self
            .collection()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| {
                let bucket = document.get_document("_id").map_err(field_error)?;
                let month = bucket.get_i32("month").map_err(field_error)?;

                Ok(MonthlyTotal {
                    year: bucket.get_i32("year").map_err(field_error)?,
                    month: crate::window::month_from_number(month as u8),
                    expenses: numeric_field(&document, "expenses")?,
                })
            })
            .collect()
    }

    async fn expense_totals_by_category(
        &self,
        range: InstantRange,
    ) -> Result<Vec<CategoryTotal>, Error> {
        let pipeline = vec![
            doc! {
                "$match": {
                    "type": TransactionType::Expense.as_str(),
                    "date": {
                        "$gte": bson_datetime(range.start),
                        "$lte": bson_datetime(range.end),
                    },
                },
            },
            doc! {
                "$group": {
                    "_id": "$category",
                    "value": { "$sum": "$amount" },
                },
            },
            doc! {
                "$sort": { "value": -1 },
            },
        ];

        let documents: Vec<Document> = self
            .collection()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| {
                Ok(CategoryTotal {
                    category: document.get_str("_id").map_err(field_error)?.to_owned(),
                    total: numeric_field(&document, "value")?,
                })
            })
            .collect()
    }
}

// ============================================================================
// DOCUMENT MAPPING
// ============================================================================

/// Convert an absolute instant to a BSON datetime (millisecond precision).
fn bson_datetime(instant: OffsetDateTime) -> DateTime {
    DateTime::from_millis((instant.unix_timestamp_nanos() / 1_000_000) as i64)
}

/// Convert a BSON datetime back to an absolute instant.
fn instant_from_bson(datetime: DateTime) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::from_unix_timestamp_nanos(datetime.timestamp_millis() as i128 * 1_000_000)
        .map_err(|error| Error::Database(format!("stored date out of range: {error}")))
}

/// Map a transaction to its stored document, renaming `id` to `_id`.
fn transaction_to_document(transaction: &Transaction) -> Document {
    doc! {
        "_id": transaction.id,
        "description": &transaction.description,
        "amount": transaction.amount,
        "category": &transaction.category,
        "date": bson_datetime(transaction.date),
        "type": transaction.transaction_type.as_str(),
        "createdAt": bson_datetime(transaction.created_at),
        "updatedAt": bson_datetime(transaction.updated_at),
    }
}

/// Map a stored document to a transaction.
fn map_transaction_document(document: Document) -> Result<Transaction, Error> {
    let transaction_type = document.get_str("type").map_err(field_error)?;
    let transaction_type = TransactionType::parse(transaction_type).ok_or_else(|| {
        Error::Database(format!("unknown transaction type: {transaction_type:?}"))
    })?;

    Ok(Transaction {
        id: document.get_object_id("_id").map_err(field_error)?,
        description: document.get_str("description").map_err(field_error)?.to_owned(),
        amount: numeric_field(&document, "amount")?,
        category: document.get_str("category").map_err(field_error)?.to_owned(),
        date: instant_from_bson(*document.get_datetime("date").map_err(field_error)?)?,
        transaction_type,
        created_at: instant_from_bson(*document.get_datetime("createdAt").map_err(field_error)?)?,
        updated_at: instant_from_bson(*document.get_datetime("updatedAt").map_err(field_error)?)?,
    })
}

/// Build the find/count filter for a transaction list query.
fn filter_document(filter: &TransactionFilter) -> Document {
    let mut document = Document::new();

    if let Some(transaction_type) = filter.transaction_type {
        document.insert("type", transaction_type.as_str());
    }

    if let Some(category) = &filter.category {
        document.insert("category", category.as_str());
    }

    let mut date = Document::new();
    if let Some(start) = filter.start {
        date.insert("$gte", bson_datetime(start));
    }
    if let Some(end) = filter.end {
        date.insert("$lte", bson_datetime(end));
    }
    if !date.is_empty() {
        document.insert("date", date);
    }

    document
}

/// The reporting offset in milliseconds, the unit `$add` expects when shifting
/// a BSON date.
fn offset_millis(offset: UtcOffset) -> i64 {
    offset.whole_seconds() as i64 * 1000
}

/// Read a numeric aggregation result that MongoDB may return as any of its
/// numeric BSON types. `$sum` over integers yields Int32 or Int64 depending
/// on magnitude, and Double over doubles.
fn numeric_field(document: &Document, key: &str) -> Result<f64, Error> {
    match document.get(key) {
        Some(Bson::Double(value)) => Ok(*value),
        Some(Bson::Int32(value)) => Ok(*value as f64),
        Some(Bson::Int64(value)) => Ok(*value as f64),
        _ => Err(Error::Database(format!(
            "expected a numeric value for field {key:?}"
        ))),
    }
}

fn field_error(error: ValueAccessError) -> Error {
    Error::Database(format!("malformed transaction document: {error}"))
}

// ============================================================================
// TESTS
// ============================================================================
