//! The fixed category vocabulary for income and expense transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionKind;

/// The category of a transaction.
///
/// Which categories are valid depends on the [TransactionKind], see
/// [Category::for_kind]. `Other` is valid for both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Income from employment.
    Salary,
    /// Income from contract work.
    Freelance,
    /// Income from dividends, interest and the like.
    Investments,
    /// Groceries and eating out.
    Food,
    /// Fuel for vehicles.
    Fuel,
    /// Movies and other entertainment.
    Movie,
    /// Loan repayments.
    Loan,
    /// Medical bills and prescriptions.
    Medical,
    /// General shopping.
    Shopping,
    /// Anything else, valid for both income and expenses.
    Other,
}

const INCOME_CATEGORIES: [Category; 4] = [
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Other,
];

const EXPENSE_CATEGORIES: [Category; 7] = [
    Category::Food,
    Category::Fuel,
    Category::Movie,
    Category::Loan,
    Category::Medical,
    Category::Shopping,
    Category::Other,
];

impl Category {
    /// The categories a transaction of `kind` may use, in display order.
    pub fn for_kind(kind: TransactionKind) -> &'static [Category] {
        match kind {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Whether this category belongs to the vocabulary of `kind`.
    pub fn is_valid_for(self, kind: TransactionKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }

    /// The wire and display name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investments => "Investments",
            Self::Food => "Food",
            Self::Fuel => "Fuel",
            Self::Movie => "Movie",
            Self::Loan => "Loan",
            Self::Medical => "Medical",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
