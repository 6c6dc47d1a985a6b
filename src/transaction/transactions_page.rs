//! The page listing every transaction and the table rows shared with the dashboard.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::OffsetDateTime;

use crate::{
    api::TransactionsApi,
    app_state::DisplaySettings,
    dashboard::{is_editable, sort_recent},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, format_date,
    },
    navigation::NavBar,
    store::TransactionStore,
    transaction::{Transaction, TransactionKind},
};

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "text-green-700 dark:text-green-300",
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
    }
}

/// The signed, formatted amount of a transaction, e.g. "-₹12.50".
fn signed_amount(transaction: &Transaction, currency_symbol: &str) -> String {
    match transaction.kind {
        TransactionKind::Income => {
            format!("+{}", format_currency(transaction.amount, currency_symbol))
        }
        TransactionKind::Expense => format_currency(-transaction.amount, currency_symbol),
    }
}

fn transaction_row(
    transaction: &Transaction,
    now: OffsetDateTime,
    currency_symbol: &str,
) -> Markup {
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id.as_ref());
    let edit_url = is_editable(transaction, now)
        .then(|| format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_ref()));
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.title
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="font-medium text-gray-900 dark:text-white" { (transaction.title) }

                @if let Some(note) = &transaction.note {
                    div class="text-xs text-gray-500 dark:text-gray-400" { (note) }
                }
            }
            td class={ "px-6 py-4 text-right whitespace-nowrap " (amount_class(transaction.kind)) }
            {
                (signed_amount(transaction, currency_symbol))
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.division.as_str()) }
            td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
            {
                time datetime=(transaction.date) { (format_date(transaction.date)) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    @if let Some(edit_url) = edit_url {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    } @else {
                        span
                            class="text-gray-400 dark:text-gray-500 cursor-not-allowed"
                            title="Transactions can only be edited within 12 hours of being created."
                        {
                            "Edit"
                        }
                    }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// A table of `transactions` in the given order.
///
/// Each row links to the edit page while the transaction is still editable
/// at `now` and has a button that deletes the transaction.
pub(crate) fn transactions_table(
    transactions: &[Transaction],
    now: OffsetDateTime,
    currency_symbol: &str,
) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded-lg w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Division" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction, now, currency_symbol))
                    }
                }
            }
        }
    }
}

/// The banner shown when the last request to the remote API failed.
pub(crate) fn store_error_banner(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            div
                role="alert"
                class="w-full p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                dark:bg-gray-800 dark:text-red-400"
            {
                span class="font-medium" { (error) }
                " The transactions shown may be out of date. "

                button
                    type="button"
                    hx-post=(endpoints::RELOAD_TRANSACTIONS)
                    hx-target-error="#alert-container"
                    class=(LINK_STYLE)
                {
                    "Reload"
                }
            }
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    error: Option<&str>,
    now: OffsetDateTime,
    currency_symbol: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                (store_error_banner(error))

                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                @if transactions.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" data-empty-state="true"
                    {
                        "No transactions yet. "
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Add your first transaction"
                        }
                        "."
                    }
                } @else {
                    (transactions_table(transactions, now, currency_symbol))
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

/// Renders every transaction in the store, most recent first.
pub async fn get_transactions_page<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    State(settings): State<DisplaySettings>,
) -> Response {
    let state = store.state();
    let transactions = sort_recent(&state.transactions);

    transactions_view(
        &transactions,
        state.error.as_deref(),
        OffsetDateTime::now_utc(),
        &settings.currency_symbol,
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use scraper::Selector;
    use time::{Duration, OffsetDateTime};

    use super::get_transactions_page;
    use crate::{
        api::{ApiError, TransactionQuery},
        app_state::DisplaySettings,
        dashboard::WeekStart,
        endpoints::{self, format_endpoint},
        store::TransactionStore,
        test_utils::{
            FakeApi, assert_status_ok, assert_valid_html, parse_html_document, sample_transaction,
        },
        transaction::{Category, Transaction, TransactionKind},
    };

    fn settings() -> DisplaySettings {
        DisplaySettings {
            local_timezone: "Etc/UTC".to_owned(),
            week_start: WeekStart::Sunday,
            currency_symbol: "₹".to_owned(),
        }
    }

    async fn store_with(transactions: Vec<Transaction>) -> Arc<TransactionStore<FakeApi>> {
        let store = TransactionStore::new(FakeApi::with_transactions(transactions));
        store.load(&TransactionQuery::default()).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn lists_transactions_most_recent_first() {
        let mut older = sample_transaction("older");
        older.date = older.date - Duration::days(3);
        let mut salary = sample_transaction("salary");
        salary.kind = TransactionKind::Income;
        salary.category = Category::Salary;
        salary.title = "Salary".to_owned();
        let store = store_with(vec![older, salary]).await;

        let response = get_transactions_page(State(store), State(settings())).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows: Vec<_> = html
            .select(&Selector::parse("tbody tr").unwrap())
            .filter_map(|row| row.value().attr("data-transaction-id"))
            .collect();
        assert_eq!(rows, ["salary", "older"]);
        let amounts: Vec<String> = html
            .select(&Selector::parse("tbody tr td:nth-child(2)").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(amounts, ["+₹12.50", "-₹12.50"]);
    }

    #[tokio::test]
    async fn edit_link_only_within_edit_window() {
        let mut fresh = sample_transaction("fresh");
        fresh.created_at = OffsetDateTime::now_utc() - Duration::hours(1);
        let mut locked = sample_transaction("locked");
        locked.created_at = OffsetDateTime::now_utc() - Duration::hours(13);
        let store = store_with(vec![fresh, locked]).await;

        let response = get_transactions_page(State(store), State(settings())).await;

        let html = parse_html_document(response).await;
        let edit_links: Vec<_> = html
            .select(&Selector::parse("tbody a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            edit_links,
            [format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, "fresh")]
        );
        let delete_buttons: Vec<_> = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .filter_map(|button| button.value().attr("hx-delete"))
            .collect();
        assert_eq!(
            delete_buttons,
            [
                format_endpoint(endpoints::TRANSACTION, "fresh"),
                format_endpoint(endpoints::TRANSACTION, "locked")
            ]
        );
    }

    #[tokio::test]
    async fn shows_empty_state_and_error_banner() {
        let api = FakeApi::default();
        let store = TransactionStore::new(api.clone());
        api.fail_next(ApiError::Rejected("Database offline".to_owned()));
        store.load(&TransactionQuery::default()).await.unwrap_err();

        let response = get_transactions_page(State(Arc::new(store)), State(settings())).await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .next()
                .is_some()
        );
        let banner = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("want error banner");
        assert!(banner.text().collect::<String>().contains("Database offline"));
    }
}
