//! Money Manager is a web app for tracking personal income and expenses.
//!
//! The transactions themselves live in a remote REST service. This library
//! keeps a local mirror of that collection in a [TransactionStore], derives
//! the dashboard summary from it, and serves HTML pages that read from and
//! write through the store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use api::{ApiError, HttpTransactionsApi, TransactionQuery, TransactionsApi};
pub use app_state::AppState;
pub use dashboard::{
    CategoryTotal, DashboardSummary, DateRange, EDIT_WINDOW, Period, Totals, WeekStart,
    compute_category_breakdown, compute_totals, expense_ratio, filter_by_period, is_editable,
    sort_recent,
};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{LOAD_ATTEMPTS, MutationOutcome, StoreState, TransactionStore};
pub use transaction::{
    Category, Division, Transaction, TransactionDraft, TransactionId, TransactionKind,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
