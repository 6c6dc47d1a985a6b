//! Defines the endpoint for deleting a transaction.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    alert::Alert, api::TransactionsApi, store::TransactionStore, transaction::TransactionId,
};

/// A route handler for deleting a transaction.
///
/// Responds with no row content so HTMX removes the table row, plus a success
/// alert swapped out-of-band into the alert container. Responds with an error
/// alert if the transaction could not be deleted.
pub async fn delete_transaction_endpoint<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let title = store
        .get(&transaction_id)
        .map(|transaction| transaction.title)
        .unwrap_or_default();

    if let Err(error) = store.remove(&transaction_id).await {
        return error.into_alert_response();
    }

    let alert = Alert::Success {
        message: "Transaction deleted".to_owned(),
        details: title,
    };

    // The status code has to be 200 OK or HTMX will not delete the table row.
    html! {
        div id="alert-container" hx-swap-oob="innerHTML" { (alert.into_html()) }
    }
    .into_response()
}
