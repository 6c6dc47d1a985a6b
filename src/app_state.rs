//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    Error, api::TransactionsApi, dashboard::WeekStart, store::TransactionStore,
    timezone::get_local_offset,
};

/// The state of the web server.
#[derive(Debug)]
pub struct AppState<A> {
    /// The store shared by every request handler.
    pub store: Arc<TransactionStore<A>>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The day that weekly reporting periods start on.
    pub week_start: WeekStart,

    /// The symbol shown in front of monetary amounts, e.g. "₹".
    pub currency_symbol: String,
}

// Derived `Clone` would require `A: Clone`, but only the `Arc` is cloned.
impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            local_timezone: self.local_timezone.clone(),
            week_start: self.week_start,
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

impl<A: TransactionsApi> AppState<A> {
    /// Create a new [AppState] around an existing store.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezone] if `local_timezone` is not a known timezone.
    pub fn new(
        store: Arc<TransactionStore<A>>,
        local_timezone: &str,
        week_start: WeekStart,
        currency_symbol: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        Ok(Self {
            store,
            local_timezone: local_timezone.to_owned(),
            week_start,
            currency_symbol: currency_symbol.to_owned(),
        })
    }
}

/// The settings that control how dates and amounts are displayed.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The day that weekly reporting periods start on.
    pub week_start: WeekStart,
    /// The symbol shown in front of monetary amounts.
    pub currency_symbol: String,
}

impl<A> FromRef<AppState<A>> for DisplaySettings {
    fn from_ref(state: &AppState<A>) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            week_start: state.week_start,
            currency_symbol: state.currency_symbol.clone(),
        }
    }
}

impl<A> FromRef<AppState<A>> for Arc<TransactionStore<A>> {
    fn from_ref(state: &AppState<A>) -> Self {
        Arc::clone(&state.store)
    }
}
