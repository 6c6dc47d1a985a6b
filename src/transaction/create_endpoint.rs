//! Defines the endpoint for creating a new transaction.
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    api::TransactionsApi,
    endpoints,
    store::TransactionStore,
    transaction::{TransactionDraft, form::TransactionForm},
};

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = TransactionDraft::from(form);

    if let Err(error) = store.create(&draft).await {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        api::ApiError,
        endpoints,
        store::TransactionStore,
        test_utils::{FakeApi, assert_hx_redirect, parse_html_fragment},
        transaction::{
            Category, Division, TransactionKind, create_transaction_endpoint,
            form::TransactionForm,
        },
    };

    fn form() -> TransactionForm {
        TransactionForm {
            title: "Fuel".to_owned(),
            amount: dec!(40.00),
            kind: TransactionKind::Expense,
            category: Category::Fuel,
            date: date!(2024 - 06 - 11),
            division: Division::Office,
            note: Some("Client visit".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let api = FakeApi::default();
        let store = Arc::new(TransactionStore::new(api.clone()));

        let response = create_transaction_endpoint(State(store.clone()), Form(form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert_eq!(api.calls().create, 1);
        let transactions = store.snapshot();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Fuel");
        assert_eq!(transactions[0].note.as_deref(), Some("Client visit"));
    }

    #[tokio::test]
    async fn invalid_category_is_not_sent() {
        let api = FakeApi::default();
        let store = Arc::new(TransactionStore::new(api.clone()));
        let form = TransactionForm {
            category: Category::Salary,
            ..form()
        };

        let response = create_transaction_endpoint(State(store.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.calls().create, 0);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_is_shown_as_alert() {
        let api = FakeApi::default();
        let store = Arc::new(TransactionStore::new(api.clone()));
        api.fail_next(ApiError::Rejected("Please add a title".to_owned()));

        let response = create_transaction_endpoint(State(store), Form(form())).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Please add a title"), "got alert text {text:?}");
    }
}
