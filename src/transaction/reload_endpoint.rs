//! Defines the endpoint for fetching the transactions from the remote API again.
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;

use crate::{
    api::{TransactionQuery, TransactionsApi},
    store::TransactionStore,
};

/// A route handler that reloads every transaction and refreshes the page on success.
pub async fn reload_transactions_endpoint<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
) -> Response {
    match store.load(&TransactionQuery::default()).await {
        Ok(()) => (HxRefresh(true), StatusCode::OK).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
