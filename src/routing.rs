//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    api::TransactionsApi,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
        reload_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<A: TransactionsApi>(state: AppState<A>) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page::<A>))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page::<A>))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page::<A>),
        );

    // These routes are called by htmx and respond with redirects via the
    // HX-Redirect header or with alert fragments.
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint::<A>),
        )
        .route(
            endpoints::RELOAD_TRANSACTIONS,
            post(reload_transactions_endpoint::<A>),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint::<A>).delete(delete_transaction_endpoint::<A>),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{
        AppState,
        api::TransactionQuery,
        dashboard::WeekStart,
        endpoints::{self, format_endpoint},
        routing::build_router,
        store::TransactionStore,
        test_utils::{FakeApi, sample_transaction},
        transaction::TransactionId,
    };

    async fn server_with_transaction(
        id: &str,
    ) -> (FakeApi, Arc<TransactionStore<FakeApi>>, TestServer) {
        let mut transaction = sample_transaction(id);
        transaction.created_at = OffsetDateTime::now_utc() - Duration::hours(1);
        let api = FakeApi::with_transactions(vec![transaction]);
        let store = Arc::new(TransactionStore::new(api.clone()));
        store.load(&TransactionQuery::default()).await.unwrap();

        let state = AppState::new(store.clone(), "Etc/UTC", WeekStart::Sunday, "₹").unwrap();
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        (api, store, server)
    }

    fn edit_form() -> [(&'static str, &'static str); 6] {
        [
            ("title", "Dinner"),
            ("amount", "30.00"),
            ("type", "expense"),
            ("category", "Food"),
            ("date", "2024-06-10"),
            ("division", "Personal"),
        ]
    }

    #[tokio::test]
    async fn put_transaction_dispatches_to_edit() {
        let (api, store, server) = server_with_transaction("abc").await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, "abc"))
            .form(&edit_form())
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::TRANSACTIONS_VIEW);
        assert_eq!(api.calls().update, 1);
        assert_eq!(store.get(&TransactionId::new("abc")).unwrap().title, "Dinner");
    }

    #[tokio::test]
    async fn delete_transaction_dispatches_to_delete() {
        let (api, store, server) = server_with_transaction("abc").await;

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, "abc"))
            .await;

        response.assert_status_ok();
        assert_eq!(api.calls().delete, 1);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn reload_is_not_captured_by_transaction_route() {
        let (api, store, server) = server_with_transaction("abc").await;
        api.set_transactions(vec![sample_transaction("abc"), sample_transaction("def")]);

        let response = server.post(endpoints::RELOAD_TRANSACTIONS).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-refresh"), "true");
        assert_eq!(api.calls().list, 2);
        assert_eq!(api.calls().delete, 0);
        assert_eq!(api.calls().update, 0);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn percent_encoded_id_reaches_handler_decoded() {
        let id = "a/b c";
        let (api, store, server) = server_with_transaction(id).await;

        let path = format_endpoint(endpoints::TRANSACTION, id);
        assert_eq!(path, "/api/transactions/a%2Fb%20c");

        server.delete(&path).await.assert_status_ok();

        assert_eq!(api.calls().delete, 1);
        assert_eq!(store.get(&TransactionId::new(id)), None);
    }

    #[tokio::test]
    async fn unknown_route_renders_not_found() {
        let (_, _, server) = server_with_transaction("abc").await;

        let response = server.get("/no/such/page").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
