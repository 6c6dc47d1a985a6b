//! The figures shown on the dashboard for one reporting period.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    dashboard::{
        aggregation::{
            CategoryTotal, compute_category_breakdown, compute_totals, expense_ratio,
            filter_by_period, sort_recent,
        },
        period::{Period, WeekStart},
    },
    transaction::Transaction,
};

/// How many transactions the recent activity list shows.
pub const RECENT_LIMIT: usize = 5;

/// Everything the dashboard displays for the selected period.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// The period the totals were computed for.
    pub period: Period,
    /// Income minus expenses within the period.
    pub total_balance: Decimal,
    /// The sum of income within the period.
    pub income_total: Decimal,
    /// The sum of expenses within the period.
    pub expense_total: Decimal,
    /// Expenses as a percentage of income, see [expense_ratio].
    pub expense_ratio: Decimal,
    /// Expenses within the period grouped by category.
    pub category_breakdown: Vec<CategoryTotal>,
    /// The most recent transactions of the whole collection.
    pub recent_transactions: Vec<Transaction>,
}

impl DashboardSummary {
    /// Summarise `transactions` for `period` around `today`.
    pub fn new(
        transactions: &[Transaction],
        period: Period,
        today: Date,
        week_start: WeekStart,
    ) -> Self {
        let filtered = filter_by_period(transactions, period, today, week_start);
        let totals = compute_totals(&filtered);

        let mut recent_transactions = sort_recent(transactions);
        recent_transactions.truncate(RECENT_LIMIT);

        Self {
            period,
            total_balance: totals.balance,
            income_total: totals.income,
            expense_total: totals.expenses,
            expense_ratio: expense_ratio(&totals),
            category_breakdown: compute_category_breakdown(&filtered),
            recent_transactions,
        }
    }

    /// Whether the period contains no transactions at all.
    pub fn is_empty(&self) -> bool {
        self.income_total.is_zero() && self.expense_total.is_zero()
    }
}
