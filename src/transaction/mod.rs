//! Transactions and the pages for managing them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its category vocabulary and wire format
//! - The form shared by the create and edit pages
//! - Route handlers that forward changes to the [crate::TransactionStore]

mod category;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod reload_endpoint;
mod transactions_page;

pub use category::Category;
pub use core::{Division, Transaction, TransactionDraft, TransactionId, TransactionKind};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use reload_endpoint::reload_transactions_endpoint;
pub use transactions_page::get_transactions_page;

pub(crate) use transactions_page::{store_error_banner, transactions_table};
