//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The query parameters accepted by the handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    api::TransactionsApi,
    app_state::DisplaySettings,
    dashboard::{
        cards::summary_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT, category_breakdown_chart, chart_view, charts_script,
        },
        period::{DateRange, Period},
        summary::DashboardSummary,
    },
    endpoints,
    html::{HeadElement, base, link, loading_spinner},
    navigation::NavBar,
    store::TransactionStore,
    timezone::current_local_date,
    transaction::{store_error_banner, transactions_table},
};

const CATEGORY_CHART_ID: &str = "category-breakdown-chart";

const PERIOD_TAB_STYLE: &str = "inline-block px-4 py-2 rounded-lg \
    hover:text-gray-900 hover:bg-gray-100 dark:hover:bg-gray-800 dark:hover:text-white";
const PERIOD_TAB_ACTIVE_STYLE: &str =
    "inline-block px-4 py-2 rounded-lg text-white bg-blue-600 active";

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The reporting period, defaults to the current month.
    pub period: Option<Period>,
}

/// Display a page with an overview of the user's finances for a period.
pub async fn get_dashboard_page<A: TransactionsApi>(
    State(store): State<Arc<TransactionStore<A>>>,
    State(settings): State<DisplaySettings>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let period = query.period.unwrap_or_default();
    let today = current_local_date(&settings.local_timezone)?;
    let summary = store.get_filtered_summary(period, today, settings.week_start);
    let range = period.range(today, settings.week_start);
    let error = store.last_error();
    let is_loading = store.is_loading();

    if summary.recent_transactions.is_empty() {
        return Ok(dashboard_no_data_view(error.as_deref(), is_loading).into_response());
    }

    Ok(dashboard_view(
        &summary,
        range,
        error.as_deref(),
        is_loading,
        &settings.currency_symbol,
    )
    .into_response())
}

fn period_tabs(selected: Period) -> Markup {
    html!(
        nav id="period-tabs" aria-label="Reporting period" class="w-full mb-4"
        {
            ul class="flex flex-wrap gap-2 text-sm font-medium text-center text-gray-500 dark:text-gray-400"
            {
                @for period in Period::ALL {
                    li
                    {
                        @if period == selected {
                            a
                                href={ (endpoints::DASHBOARD_VIEW) "?period=" (period.as_query_value()) }
                                class=(PERIOD_TAB_ACTIVE_STYLE)
                                aria-current="page"
                            {
                                (period.label())
                            }
                        } @else {
                            a
                                href={ (endpoints::DASHBOARD_VIEW) "?period=" (period.as_query_value()) }
                                class=(PERIOD_TAB_STYLE)
                            {
                                (period.label())
                            }
                        }
                    }
                }
            }
        }
    )
}

fn loading_indicator(is_loading: bool) -> Markup {
    html!(
        @if is_loading {
            div
                class="w-full mb-4 text-sm text-gray-600 dark:text-gray-400"
                data-loading="true"
            {
                (loading_spinner()) " Refreshing transactions..."
            }
        }
    )
}

/// Renders the dashboard page when there are no transactions at all.
fn dashboard_no_data_view(error: Option<&str>, is_loading: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            (store_error_banner(error))
            (loading_indicator(is_loading))

            h2 class="text-xl font-bold" data-empty-state="true"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your summary and charts will show up here once you "
                (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the summary cards, chart and recent transactions.
fn dashboard_view(
    summary: &DashboardSummary,
    range: Option<DateRange>,
    error: Option<&str>,
    is_loading: bool,
    currency_symbol: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = (!summary.category_breakdown.is_empty()).then(|| DashboardChart {
        id: CATEGORY_CHART_ID,
        options: category_breakdown_chart(
            &summary.category_breakdown,
            summary.period,
            currency_symbol,
        )
        .to_string(),
    });
    let now = OffsetDateTime::now_utc();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (store_error_banner(error))
            (loading_indicator(is_loading))
            (period_tabs(summary.period))

            @if let Some(range) = range {
                p class="w-full mb-4 text-sm text-gray-600 dark:text-gray-400" { (range) }
            }

            @if summary.is_empty() {
                p class="w-full mb-4 text-gray-500 dark:text-gray-400" data-period-empty="true"
                {
                    "No transactions for " (summary.period.label().to_lowercase()) " yet."
                }
            }

            (summary_cards_view(summary, currency_symbol))

            section id="charts" class="w-full mx-auto mb-8"
            {
                @if let Some(chart) = &chart {
                    (chart_view(chart))
                } @else {
                    p class="text-gray-500 dark:text-gray-400" data-no-expenses="true"
                    {
                        "No expenses recorded for " (summary.period.label().to_lowercase()) "."
                    }
                }
            }

            section id="recent-transactions" class="w-full mb-8"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h3 class="text-xl font-semibold" { "Recent Transactions" }
                    (link(endpoints::TRANSACTIONS_VIEW, "View all"))
                }

                (transactions_table(&summary.recent_transactions, now, currency_symbol))
            }
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(&[chart]),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}
