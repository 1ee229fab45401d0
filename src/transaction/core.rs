//! Defines the core transaction model and the validated input payload.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset, macros::format_description};

use crate::{Error, window::day_start};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brings money in or takes money out.
///
/// This is the only carrier of direction; amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// Parse the wire value ("income" or "expense"). Any other string is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The wire value for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// An income or expense recorded against a calendar day.
///
/// `date` is the absolute instant of local midnight of that day in the
/// reporting timezone, so a round trip through the store preserves the
/// calendar day exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, serialized as its 24-character hex string.
    #[serde(with = "object_id_string")]
    pub id: ObjectId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction. Always positive.
    pub amount: f64,
    /// The label the transaction is grouped under in the category breakdown.
    pub category: String,
    /// When the transaction happened, anchored to local midnight.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether this transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last edited. Used as the tie-break sort key
    /// when listing transactions.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

/// The smallest accepted transaction amount.
pub const MINIMUM_AMOUNT: f64 = 0.01;

/// The JSON body for creating or updating a transaction.
///
/// Every field arrives optional so that validation can answer with the
/// field-specific message instead of a serde rejection. The same payload
/// and rules apply to both the create and update paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// The amount of money spent or earned.
    pub amount: Option<f64>,
    /// The category label for the transaction.
    pub category: Option<String>,
    /// The calendar day of the transaction as "YYYY-MM-DD".
    pub date: Option<String>,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// A payload that has passed validation, ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    /// The trimmed description.
    pub description: String,
    /// The amount, at least [MINIMUM_AMOUNT].
    pub amount: f64,
    /// The trimmed category label.
    pub category: String,
    /// Local midnight of the requested calendar day in the reporting timezone.
    pub date: OffsetDateTime,
    /// Whether this transaction is income or an expense.
    pub transaction_type: TransactionType,
}

impl TransactionPayload {
    /// Validate the payload against the storage schema rules.
    ///
    /// The first violated rule wins, checked in order: field presence,
    /// amount positivity, type enumeration, date format. `offset` is the
    /// civil timezone the date-only input is anchored in.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::MissingFields] if any field is absent or blank,
    /// - [Error::InvalidAmount] if the amount is below [MINIMUM_AMOUNT],
    /// - [Error::InvalidTransactionType] if the type is not "income" or "expense",
    /// - [Error::InvalidDate] if the date is not a valid "YYYY-MM-DD" date.
    pub fn validate(self, offset: UtcOffset) -> Result<ValidTransaction, Error> {
        let (Some(description), Some(amount), Some(category), Some(date), Some(transaction_type)) = (
            self.description,
            self.amount,
            self.category,
            self.date,
            self.transaction_type,
        ) else {
            return Err(Error::MissingFields);
        };

        let description = description.trim().to_owned();
        let category = category.trim().to_owned();

        if description.is_empty()
            || category.is_empty()
            || date.is_empty()
            || transaction_type.is_empty()
        {
            return Err(Error::MissingFields);
        }

        if amount < MINIMUM_AMOUNT {
            return Err(Error::InvalidAmount);
        }

        let transaction_type =
            TransactionType::parse(&transaction_type).ok_or(Error::InvalidTransactionType)?;

        let date = parse_transaction_date(&date)?;

        Ok(ValidTransaction {
            description,
            amount,
            category,
            date: day_start(date, offset),
            transaction_type,
        })
    }
}

pub(crate) fn parse_transaction_date(value: &str) -> Result<Date, Error> {
    let format = format_description!("[year]-[month]-[day]");

    Date::parse(value, format).map_err(|_| Error::InvalidDate)
}

mod object_id_string {
    //! Serializes an ObjectId as its plain hex string instead of the
    //! extended-JSON `{"$oid": ...}` form.

    use mongodb::bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let hex = String::deserialize(deserializer)?;

        ObjectId::parse_str(&hex).map_err(de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
