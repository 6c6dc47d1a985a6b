//! The transaction store: a client-local mirror of the remote collection.
//!
//! The store never persists anything itself. Every mutation is sent to the
//! remote API first and the local collection is only patched from the
//! server's response, see [StoreState::apply].

mod state;

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    api::{TransactionQuery, TransactionsApi},
    dashboard::{DashboardSummary, Period, WeekStart, is_editable},
    transaction::{Transaction, TransactionDraft, TransactionId},
};

pub use state::{Command, StoreState};

/// The message shown when the remote API fails without saying why.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";
/// The message shown when an update fails without the remote API saying why.
pub const UPDATE_FAILED_MESSAGE: &str = "Update Failed";

/// The message returned when every load attempt was overtaken by a mutation.
pub const LOAD_INTERRUPTED_MESSAGE: &str =
    "Transactions changed while loading, please reload";

/// How many times [TransactionStore::load] sends its request before giving up.
pub const LOAD_ATTEMPTS: usize = 2;

/// How a single load request settled.
#[derive(Debug)]
enum LoadAttempt {
    Applied,
    /// A load issued later was applied first.
    Superseded,
    /// A mutation was confirmed while the request was in flight.
    Overtaken,
    Failed(Error),
}

/// The result of a mutation as seen by the presentation layer.
///
/// This is the library-level result shape for callers that drive a
/// [TransactionStore] without the bundled HTTP endpoints, e.g. another UI.
/// The endpoints map a failed [Result] straight to an alert with
/// [Error::into_alert_response] instead, so they do not go through this type.
///
/// Any `Result<T, Error>` returned by the store converts into it:
/// the error's display text becomes [MutationOutcome::error].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether the server confirmed the mutation.
    pub success: bool,
    /// The message to show the user when the mutation failed.
    pub error: Option<String>,
}

impl<T> From<Result<T, Error>> for MutationOutcome {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                error: None,
            },
            Err(error) => Self {
                success: false,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Bookkeeping that must be read and written together with the state.
#[derive(Debug, Default)]
struct Inner {
    state: StoreState,
    /// Transactions with an update or delete request in flight.
    in_flight: HashSet<TransactionId>,
    /// The number of load requests issued so far.
    loads_issued: u64,
    /// The sequence number of the most recently applied load.
    load_applied: u64,
    /// The number of mutations the server has confirmed so far.
    mutations_settled: u64,
}

impl Inner {
    fn dispatch(&mut self, command: Command) {
        self.state = std::mem::take(&mut self.state).apply(command);
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // The state is only ever replaced wholesale, so it is consistent even if
    // a holder of the lock panicked.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A request that has been issued but has not been settled yet.
///
/// Settles itself with [Command::Discarded] when dropped, e.g. when the future
/// awaiting the response is cancelled, so the loading flag and the in-flight
/// set never leak.
struct PendingRequest<'a> {
    inner: &'a Mutex<Inner>,
    entity: Option<TransactionId>,
    settled: bool,
}

impl<'a> PendingRequest<'a> {
    fn start(inner: &'a Mutex<Inner>, guard: &mut Inner, entity: Option<TransactionId>) -> Self {
        guard.dispatch(Command::RequestStarted);

        Self {
            inner,
            entity,
            settled: false,
        }
    }

    /// Apply the command chosen by `decide` while holding the lock.
    fn settle(mut self, decide: impl FnOnce(&mut Inner) -> Command) {
        let mut inner = lock(self.inner);

        if let Some(id) = self.entity.take() {
            inner.in_flight.remove(&id);
        }

        let command = decide(&mut inner);
        inner.dispatch(command);
        self.settled = true;
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut inner = lock(self.inner);

        if let Some(id) = self.entity.take() {
            inner.in_flight.remove(&id);
        }

        tracing::debug!("request was cancelled before it settled");
        inner.dispatch(Command::Discarded);
    }
}

/// Mediates all reads and writes of transactions between the presentation
/// layer and the remote API.
///
/// The store is constructed once at start-up and shared by reference. Its
/// lock is only held for short synchronous sections, never while waiting on
/// the network.
#[derive(Debug)]
pub struct TransactionStore<A> {
    api: A,
    inner: Mutex<Inner>,
}

impl<A: TransactionsApi> TransactionStore<A> {
    /// Create an empty store that synchronises with `api`.
    pub fn new(api: A) -> Self {
        Self {
            api,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replace the local collection with the one held by the remote API.
    ///
    /// On failure the previous collection is kept and the error is recorded.
    /// A response, successful or not, is discarded if a load issued later has
    /// already been applied. A successful response is also discarded if a
    /// mutation was confirmed while the request was in flight, since it may
    /// not reflect that mutation. The request is then sent again, up to
    /// [LOAD_ATTEMPTS] times in total.
    ///
    /// # Errors
    /// Returns an [Error::Server] if the request failed, or if every attempt
    /// was overtaken by a mutation.
    pub async fn load(&self, query: &TransactionQuery) -> Result<(), Error> {
        for attempt in 1..=LOAD_ATTEMPTS {
            match self.load_once(query).await {
                LoadAttempt::Applied | LoadAttempt::Superseded => return Ok(()),
                LoadAttempt::Failed(error) => return Err(error),
                LoadAttempt::Overtaken => {
                    tracing::info!(
                        "transactions changed during load attempt {attempt}/{LOAD_ATTEMPTS}"
                    );
                }
            }
        }

        tracing::error!("gave up loading transactions after {LOAD_ATTEMPTS} attempts");
        Err(Error::Server(LOAD_INTERRUPTED_MESSAGE.to_owned()))
    }

    async fn load_once(&self, query: &TransactionQuery) -> LoadAttempt {
        let (request, sequence, mutations_at_issue) = {
            let mut inner = lock(&self.inner);
            inner.loads_issued += 1;
            let sequence = inner.loads_issued;
            let mutations = inner.mutations_settled;
            (
                PendingRequest::start(&self.inner, &mut inner, None),
                sequence,
                mutations,
            )
        };

        let response = self.api.list(query).await;
        let mut attempt = LoadAttempt::Applied;

        request.settle(|inner| {
            if sequence < inner.load_applied {
                tracing::warn!("discarding outdated response for load #{sequence}");
                attempt = LoadAttempt::Superseded;
                return Command::Discarded;
            }

            match response {
                Ok(_) if inner.mutations_settled != mutations_at_issue => {
                    tracing::warn!("discarding response for load #{sequence}, a mutation settled");
                    attempt = LoadAttempt::Overtaken;
                    Command::Discarded
                }
                Ok(transactions) => {
                    tracing::debug!(
                        "load #{sequence} returned {} transactions",
                        transactions.len()
                    );
                    inner.load_applied = sequence;
                    Command::Loaded(transactions)
                }
                Err(error) => {
                    let message = error.message_or(SERVER_ERROR_MESSAGE);
                    tracing::error!("could not load transactions: {message}");
                    attempt = LoadAttempt::Failed(Error::Server(message.clone()));
                    Command::Failed(message)
                }
            }
        });

        attempt
    }

    /// Create a transaction on the remote API and add the record it returns
    /// to the local collection.
    ///
    /// # Errors
    /// Returns an [Error::Validation] without contacting the server if the
    /// draft is malformed, or an [Error::Server] if the request failed.
    pub async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, Error> {
        draft
            .validate()
            .inspect_err(|error| tracing::warn!("rejected new transaction: {error}"))?;

        let request = {
            let mut inner = lock(&self.inner);
            PendingRequest::start(&self.inner, &mut inner, None)
        };

        let response = self.api.create(draft).await;
        let mut outcome = Err(Error::Server(SERVER_ERROR_MESSAGE.to_owned()));

        request.settle(|inner| match response {
            Ok(transaction) => {
                tracing::info!("created transaction {}", transaction.id);
                inner.mutations_settled += 1;
                outcome = Ok(transaction.clone());
                Command::Added(transaction)
            }
            Err(error) => {
                let message = error.message_or(SERVER_ERROR_MESSAGE);
                tracing::error!("could not create transaction: {message}");
                outcome = Err(Error::Server(message.clone()));
                Command::Failed(message)
            }
        });

        outcome
    }

    /// Replace the user-editable fields of the transaction `id`.
    ///
    /// The edit window is checked against `now` before anything is sent.
    ///
    /// # Errors
    /// Without contacting the server, returns an:
    /// - [Error::NotFound] if `id` is not in the local collection,
    /// - [Error::EditWindowExpired] if the transaction is older than the edit window,
    /// - [Error::Validation] if the draft is malformed,
    /// - [Error::MutationInProgress] if `id` already has a request in flight.
    ///
    /// Returns an [Error::Server] if the request failed.
    pub async fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
        now: OffsetDateTime,
    ) -> Result<Transaction, Error> {
        let request = {
            let mut inner = lock(&self.inner);

            let transaction = inner.state.get(id).ok_or(Error::NotFound)?;

            if !is_editable(transaction, now) {
                tracing::warn!("refused to edit transaction {id}, the edit window has expired");
                return Err(Error::EditWindowExpired(id.clone()));
            }

            draft
                .validate()
                .inspect_err(|error| tracing::warn!("rejected edit of {id}: {error}"))?;

            self.claim(&mut inner, id)?
        };

        let response = self.api.update(id, draft).await;
        let mut outcome = Err(Error::Server(UPDATE_FAILED_MESSAGE.to_owned()));

        request.settle(|inner| match response {
            Ok(transaction) => {
                tracing::info!("updated transaction {}", transaction.id);
                inner.mutations_settled += 1;
                outcome = Ok(transaction.clone());
                Command::Updated(transaction)
            }
            Err(error) => {
                let message = error.message_or(UPDATE_FAILED_MESSAGE);
                tracing::error!("could not update transaction {id}: {message}");
                outcome = Err(Error::Server(message.clone()));
                Command::Failed(message)
            }
        });

        outcome
    }

    /// Delete the transaction `id` on the remote API, then locally.
    ///
    /// # Errors
    /// Returns an [Error::MutationInProgress] without contacting the server if
    /// `id` already has a request in flight, or an [Error::Server] if the
    /// request failed.
    pub async fn remove(&self, id: &TransactionId) -> Result<(), Error> {
        let request = {
            let mut inner = lock(&self.inner);
            self.claim(&mut inner, id)?
        };

        let response = self.api.delete(id).await;
        let mut outcome = Ok(());

        request.settle(|inner| match response {
            Ok(()) => {
                tracing::info!("deleted transaction {id}");
                inner.mutations_settled += 1;
                Command::Removed(id.clone())
            }
            Err(error) => {
                let message = error.message_or(SERVER_ERROR_MESSAGE);
                tracing::error!("could not delete transaction {id}: {message}");
                outcome = Err(Error::Server(message.clone()));
                Command::Failed(message)
            }
        });

        outcome
    }

    /// Mark `id` as having a mutation in flight.
    fn claim<'a>(
        &'a self,
        inner: &mut Inner,
        id: &TransactionId,
    ) -> Result<PendingRequest<'a>, Error> {
        if !inner.in_flight.insert(id.clone()) {
            tracing::warn!("ignored request for {id}, another request is still in flight");
            return Err(Error::MutationInProgress(id.clone()));
        }

        Ok(PendingRequest::start(
            &self.inner,
            inner,
            Some(id.clone()),
        ))
    }

    /// A copy of everything the presentation layer can observe.
    pub fn state(&self) -> StoreState {
        lock(&self.inner).state.clone()
    }

    /// A copy of the local collection.
    pub fn snapshot(&self) -> Vec<Transaction> {
        lock(&self.inner).state.transactions.clone()
    }

    /// Find a transaction in the local collection.
    pub fn get(&self, id: &TransactionId) -> Option<Transaction> {
        lock(&self.inner).state.get(id).cloned()
    }

    /// The message of the most recent failed request, if any.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.inner).state.error.clone()
    }

    /// Whether any request is in flight.
    pub fn is_loading(&self) -> bool {
        lock(&self.inner).state.is_loading()
    }

    /// Summarise the local collection for the dashboard.
    pub fn get_filtered_summary(
        &self,
        period: Period,
        today: Date,
        week_start: WeekStart,
    ) -> DashboardSummary {
        let inner = lock(&self.inner);

        DashboardSummary::new(&inner.state.transactions, period, today, week_start)
    }
}
