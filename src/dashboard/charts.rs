//! Chart generation and rendering for the dashboard.
//!
//! The expense breakdown is drawn as an ECharts pie chart. The chart is
//! generated as JSON configuration for the ECharts library and rendered with
//! a HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{ItemStyle, JsFunction, Orient, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{
    dashboard::{aggregation::CategoryTotal, period::Period},
    html::HeadElement,
};

/// The ECharts build loaded by pages that show charts.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[380px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A doughnut chart of the expenses in each category.
pub(super) fn category_breakdown_chart(
    breakdown: &[CategoryTotal],
    period: Period,
    currency_symbol: &str,
) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|entry| (entry.total.to_f64().unwrap_or_default(), entry.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by Category")
                .subtext(period.label()),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency_symbol)),
        )
        .legend(Legend::new().orient(Orient::Vertical).left("left").top("middle"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .center(vec!["60%", "55%"])
                .item_style(ItemStyle::new().border_radius(6))
                .data(data),
        )
}

fn currency_formatter(currency_symbol: &str) -> JsFunction {
    // A JSON string is also a valid JavaScript string literal.
    let symbol = serde_json::to_string(currency_symbol).unwrap_or_else(|_| "\"\"".to_owned());

    JsFunction::new_with_args(
        "number",
        &format!(
            "const formatter = new Intl.NumberFormat(undefined, {{
                minimumFractionDigits: 2,
                maximumFractionDigits: 2
            }});
            return (number) ? {symbol} + formatter.format(number) : \"-\";"
        ),
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{DashboardChart, category_breakdown_chart, charts_script};
    use crate::{
        dashboard::{aggregation::CategoryTotal, period::Period},
        html::HeadElement,
        transaction::Category,
    };

    #[test]
    fn pie_has_one_slice_per_category() {
        let breakdown = [
            CategoryTotal {
                category: Category::Food,
                total: dec!(250.50),
            },
            CategoryTotal {
                category: Category::Fuel,
                total: dec!(40),
            },
        ];

        let options = category_breakdown_chart(&breakdown, Period::Month, "₹").to_string();

        assert!(options.contains("\"Food\""), "got options {options}");
        assert!(options.contains("250.5"), "got options {options}");
        assert!(options.contains("\"Fuel\""), "got options {options}");
        assert!(options.contains("This Month"), "got options {options}");
    }

    #[test]
    fn script_initialises_each_chart() {
        let charts = [DashboardChart {
            id: "category-breakdown-chart",
            options: "{}".to_owned(),
        }];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want inline script");
        };

        assert!(script.0.contains("getElementById(\"category-breakdown-chart\")"));
        assert!(script.0.contains("DOMContentLoaded"));
    }
}
