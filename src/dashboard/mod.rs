//! Dashboard module
//!
//! Provides the reporting periods, the pure aggregation functions over a
//! transaction collection, and an overview page showing the summary for a
//! period with a chart of expenses by category.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod period;
mod summary;

pub use aggregation::{
    CategoryTotal, EDIT_WINDOW, Totals, compute_category_breakdown, compute_totals, expense_ratio,
    filter_by_period, is_editable, sort_recent,
};
pub use handlers::get_dashboard_page;
pub use period::{DateRange, Period, WeekStart};
pub use summary::DashboardSummary;
