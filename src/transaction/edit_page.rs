//! Defines the route handler for the page for editing a transaction.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    api::TransactionsApi,
    app_state::DisplaySettings,
    dashboard::is_editable,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner,
    },
    navigation::NavBar,
    store::TransactionStore,
    timezone::current_local_date,
    transaction::{
        Transaction, TransactionId,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn edit_transaction_view(
    transaction: &Transaction,
    today: Date,
    currency_symbol: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let update_route = format_endpoint(endpoints::TRANSACTION, transaction.id.as_ref());
    let draft = transaction.to_draft();
    let fields = transaction_form_fields(&TransactionFormDefaults::from_draft(&draft, today));
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_route)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Update Transaction"
                }
            }
        }
    };

    base(
        "Edit Transaction",
        &[currency_input_styles(currency_symbol)],
        &content,
    )
}

/// Renders the page for editing a transaction.
///
/// Responds with a 404 page if the transaction is not in the store and a 403
/// page if its edit window has closed.
pub async fn get_edit_transaction_page<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    State(settings): State<DisplaySettings>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = store.get(&transaction_id).ok_or(Error::NotFound)?;

    if !is_editable(&transaction, OffsetDateTime::now_utc()) {
        return Err(Error::EditWindowExpired(transaction_id));
    }

    let today = current_local_date(&settings.local_timezone)?;

    Ok(edit_transaction_view(&transaction, today, &settings.currency_symbol).into_response())
}
