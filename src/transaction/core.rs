//! Defines the core data models for transactions and their wire format.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, transaction::category::Category};

// ============================================================================
// MODELS
// ============================================================================

/// The opaque, server-assigned identifier of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap an identifier issued by the remote API.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Whether a transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The value used for this kind in forms and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The human readable name of the kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

/// Partitions transactions into personal and work-related spending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    /// Personal spending or earnings. The default.
    #[default]
    Personal,
    /// Work-related spending or earnings.
    Office,
}

impl Division {
    /// All divisions in display order.
    pub const ALL: [Division; 2] = [Division::Personal, Division::Office];

    /// The value used for this division in forms and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Office => "Office",
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are only ever constructed from responses of the remote API,
/// which assigns the `id` and `created_at` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(rename = "_id", alias = "id")]
    pub id: TransactionId,
    /// A short label for the transaction.
    pub title: String,
    /// The magnitude of the transaction, always positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category of the transaction, e.g. "Food", "Salary".
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "wire_date")]
    pub date: Date,
    /// Whether the transaction is personal or work-related.
    #[serde(default)]
    pub division: Division,
    /// Optional free text describing the transaction.
    #[serde(
        rename = "reference",
        default,
        deserialize_with = "deserialize_note",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
    /// When the remote API created the transaction.
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// The fields of this transaction that a user may replace.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            title: self.title.clone(),
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            date: self.date,
            division: self.division,
            note: self.note.clone(),
        }
    }
}

/// The user-supplied fields of a transaction, sent to the remote API when
/// creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// A short label for the transaction.
    pub title: String,
    /// The magnitude of the transaction, must be greater than zero.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Must belong to the vocabulary of `kind`.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "wire_date")]
    pub date: Date,
    /// Whether the transaction is personal or work-related.
    #[serde(default)]
    pub division: Division,
    /// Optional free text describing the transaction.
    #[serde(
        rename = "reference",
        default,
        deserialize_with = "deserialize_note",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

impl TransactionDraft {
    /// Check the draft before it is sent to the remote API.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the title is blank, the amount is not
    /// positive, or the category does not belong to the transaction kind.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title cannot be empty".to_owned()));
        }

        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Amount must be greater than zero, got {}",
                self.amount
            )));
        }

        if !self.category.is_valid_for(self.kind) {
            return Err(Error::Validation(format!(
                "{} is not a valid category for {} transactions",
                self.category,
                self.kind.as_str()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a transaction date as sent by the remote API.
///
/// The API accepts plain dates but may echo them back as full timestamps,
/// in which case the calendar date in UTC is used.
fn parse_wire_date(text: &str) -> Result<Date, time::error::Parse> {
    match Date::parse(text, DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(_) => OffsetDateTime::parse(text, &Rfc3339)
            .map(|date_time| date_time.to_offset(UtcOffset::UTC).date()),
    }
}

mod wire_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{DATE_FORMAT, parse_wire_date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_wire_date(&text).map_err(serde::de::Error::custom)
    }
}

fn deserialize_note<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let note = Option::<String>::deserialize(deserializer)?;

    Ok(note
        .map(|note| note.trim().to_owned())
        .filter(|note| !note.is_empty()))
}

// ============================================================================
// TESTS
// ============================================================================
