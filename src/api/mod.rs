//! The client side of the remote transactions REST API.
//!
//! [TransactionsApi] is the seam between the [crate::TransactionStore] and the
//! network. [HttpTransactionsApi] talks to the real service; tests substitute
//! an in-memory fake.

mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{
    Category, Division, Transaction, TransactionDraft, TransactionId, TransactionKind,
};

pub use http::HttpTransactionsApi;

/// The CRUD operations of the remote `/transactions` resource.
pub trait TransactionsApi: Send + Sync + 'static {
    /// `GET /transactions`, optionally filtered by `query`.
    fn list(
        &self,
        query: &TransactionQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, ApiError>> + Send;

    /// `POST /transactions`, returns the canonical record created by the server.
    fn create(
        &self,
        draft: &TransactionDraft,
    ) -> impl Future<Output = Result<Transaction, ApiError>> + Send;

    /// `PUT /transactions/{id}`, returns the canonical record after the update.
    fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> impl Future<Output = Result<Transaction, ApiError>> + Send;

    /// `DELETE /transactions/{id}`.
    fn delete(&self, id: &TransactionId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Why a call to the remote API failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server rejected the request and said why.
    Rejected(String),
    /// The request failed without a usable message, e.g. the server could not
    /// be reached or the response body could not be read.
    Unavailable,
}

impl ApiError {
    /// The message to show to the user, using `fallback` when the server did
    /// not supply one.
    pub fn message_or(self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(message) => message,
            ApiError::Unavailable => fallback.to_owned(),
        }
    }
}

/// Filters understood by `GET /transactions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// Only return income or only expenses.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// Only return transactions in this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Only return transactions in this division.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<Division>,
    /// Only return transactions on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// Only return transactions on or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
}

/// The envelope wrapping every successful response body.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

/// Extract the error message from the body of a failed response.
///
/// The server sends either `{"error": "..."}` or, for validation failures,
/// `{"error": ["...", "..."]}`. Multiple messages are joined with ", ".
fn parse_error_body(body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorMessage::Single(message),
        }) if !message.is_empty() => ApiError::Rejected(message),
        Ok(ErrorBody {
            error: ErrorMessage::Many(messages),
        }) if !messages.is_empty() => ApiError::Rejected(messages.join(", ")),
        Ok(_) => ApiError::Unavailable,
        Err(error) => {
            tracing::debug!("could not parse error response body: {error}");
            ApiError::Unavailable
        }
    }
}
