//! Defines the endpoint for updating a transaction.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    api::TransactionsApi,
    endpoints,
    store::TransactionStore,
    transaction::{TransactionDraft, TransactionId, form::TransactionForm},
};

/// A route handler for updating a transaction, redirects to the transactions view on success.
pub async fn edit_transaction_endpoint<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = TransactionDraft::from(form);

    if let Err(error) = store
        .update(&transaction_id, &draft, OffsetDateTime::now_utc())
        .await
    {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
