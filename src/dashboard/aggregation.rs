//! Pure aggregation of transactions for the dashboard.
//!
//! Provides functions to filter transactions by reporting period, sum income
//! and expenses, group expenses by category and order transactions for the
//! recent activity list. None of these functions perform any I/O.

use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    dashboard::period::{Period, WeekStart},
    transaction::{Category, Transaction, TransactionKind},
};

/// How long after creation a transaction may still be edited.
pub const EDIT_WINDOW: Duration = Duration::hours(12);

/// Income and expense totals for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: Decimal,
    /// The sum of all expense amounts.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
}

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: Category,
    /// The sum of expense amounts in the category.
    pub total: Decimal,
}

/// Keeps the transactions dated within `period` around `reference`.
///
/// The relative order of the transactions is preserved.
pub fn filter_by_period(
    transactions: &[Transaction],
    period: Period,
    reference: Date,
    week_start: WeekStart,
) -> Vec<Transaction> {
    match period.range(reference, week_start) {
        Some(range) => transactions
            .iter()
            .filter(|transaction| range.contains(transaction.date))
            .cloned()
            .collect(),
        None => transactions.to_vec(),
    }
}

/// Sums the income and expenses in `transactions`.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), transaction| match transaction.kind {
            TransactionKind::Income => (income + transaction.amount, expenses),
            TransactionKind::Expense => (income, expenses + transaction.amount),
        },
    );

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Groups expenses by category.
///
/// Income is ignored. Categories appear in the order they are first seen.
pub fn compute_category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        // There are only a handful of categories, a linear scan keeps the order.
        match breakdown
            .iter_mut()
            .find(|entry| entry.category == transaction.category)
        {
            Some(entry) => entry.total += transaction.amount,
            None => breakdown.push(CategoryTotal {
                category: transaction.category,
                total: transaction.amount,
            }),
        }
    }

    breakdown
}

/// Orders transactions from the most recent date to the oldest.
///
/// Transactions on the same date keep their relative order.
pub fn sort_recent(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    // `sort_by` is stable.
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Whether `transaction` may still be edited at `now`.
pub fn is_editable(transaction: &Transaction, now: OffsetDateTime) -> bool {
    now - transaction.created_at <= EDIT_WINDOW
}

/// Expenses as a percentage of income.
///
/// Saturates at 100 when there is no income.
pub fn expense_ratio(totals: &Totals) -> Decimal {
    if totals.income <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }

    totals.expenses / totals.income * Decimal::ONE_HUNDRED
}
