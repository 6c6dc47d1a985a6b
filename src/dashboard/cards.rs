//! Card components for the balance, income and expense totals.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    dashboard::summary::DashboardSummary,
    html::{format_currency, format_percentage},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";

fn card(label: &str, amount: &str, amount_class: &str, footer: Markup) -> Markup {
    html! {
        div class=(CARD_STYLE) data-summary-card=(label)
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (label) }
            p class={ "text-2xl font-semibold tabular-nums " (amount_class) } { (amount) }
            (footer)
        }
    }
}

/// The width of the expense ratio bar, in percent.
fn ratio_bar_width(ratio: Decimal) -> Decimal {
    ratio.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED).round_dp(1)
}

fn expense_ratio_bar(ratio: Decimal) -> Markup {
    let width = ratio_bar_width(ratio);
    let bar_class = if ratio >= Decimal::ONE_HUNDRED {
        "bg-red-600 h-2.5 rounded-full"
    } else {
        "bg-blue-600 h-2.5 rounded-full"
    };

    html! {
        div
            class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow=(width)
        {
            div class=(bar_class) style={ "width: " (width) "%" } {}
        }

        p class="text-xs text-gray-600 dark:text-gray-400"
        {
            (format_percentage(ratio)) " of income spent"
        }
    }
}

/// Renders the balance, income and expense cards for the summary.
pub(super) fn summary_cards_view(summary: &DashboardSummary, currency_symbol: &str) -> Markup {
    let balance_class = if summary.total_balance.is_sign_negative() && !summary.total_balance.is_zero()
    {
        "text-red-700 dark:text-red-300"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        section class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-8"
        {
            (card(
                "Total Balance",
                &format_currency(summary.total_balance, currency_symbol),
                balance_class,
                html! {
                    p class="text-xs text-gray-600 dark:text-gray-400" { (summary.period.label()) }
                },
            ))
            (card(
                "Income",
                &format_currency(summary.income_total, currency_symbol),
                "text-green-700 dark:text-green-300",
                html! {},
            ))
            (card(
                "Expenses",
                &format_currency(summary.expense_total, currency_symbol),
                "text-red-700 dark:text-red-300",
                expense_ratio_bar(summary.expense_ratio),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{ratio_bar_width, summary_cards_view};
    use crate::{
        dashboard::{
            period::{Period, WeekStart},
            summary::DashboardSummary,
        },
        test_utils::sample_transaction,
    };

    #[test]
    fn ratio_bar_is_clamped() {
        assert_eq!(ratio_bar_width(dec!(250)), dec!(100));
        assert_eq!(ratio_bar_width(dec!(-5)), dec!(0));
        assert_eq!(ratio_bar_width(dec!(33.333)), dec!(33.3));
    }

    #[test]
    fn renders_totals() {
        let summary = DashboardSummary::new(
            &[sample_transaction("a")],
            Period::Month,
            date!(2024 - 06 - 15),
            WeekStart::Sunday,
        );

        let html = Html::parse_fragment(&summary_cards_view(&summary, "₹").into_string());

        let amounts: Vec<String> = html
            .select(&Selector::parse("[data-summary-card] p.text-2xl").unwrap())
            .map(|amount| amount.text().collect())
            .collect();
        assert_eq!(amounts, ["-₹12.50", "₹0.00", "₹12.50"]);
        let ratio = html
            .select(&Selector::parse("[role=progressbar]").unwrap())
            .next()
            .unwrap();
        assert_eq!(ratio.value().attr("aria-valuenow"), Some("100"));
        assert!(html.root_element().text().any(|text| text.contains("100%")));
    }
}
