use std::sync::{Arc, Mutex};

use rust_decimal_macros::dec;
use time::{
    OffsetDateTime,
    macros::{date, datetime},
};
use tokio::sync::watch;

use crate::{
    api::{ApiError, TransactionQuery, TransactionsApi},
    transaction::{
        Category, Division, Transaction, TransactionDraft, TransactionId, TransactionKind,
    },
};

/// How many times each endpoint of a [FakeApi] has been called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Calls {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

#[derive(Debug, Default)]
struct FakeBackend {
    transactions: Vec<Transaction>,
    calls: Calls,
    next_error: Option<ApiError>,
    next_id: usize,
    held: usize,
}

/// An in-memory stand-in for the remote transactions API.
///
/// Clones share the same backend so tests can keep a handle after moving one
/// into a store.
#[derive(Debug, Clone)]
pub(crate) struct FakeApi {
    backend: Arc<Mutex<FakeBackend>>,
    hold: Arc<watch::Sender<bool>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            backend: Arc::default(),
            hold: Arc::new(watch::Sender::new(false)),
        }
    }
}

/// Keeps responses from a [FakeApi] waiting until released.
pub(crate) struct Gate {
    hold: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub(crate) fn release(&self) {
        self.hold.send_replace(false);
    }
}

impl FakeApi {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let api = Self::default();
        api.set_transactions(transactions);
        api
    }

    pub(crate) fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.backend.lock().unwrap().transactions = transactions;
    }

    pub(crate) fn calls(&self) -> Calls {
        self.backend.lock().unwrap().calls
    }

    /// Make the next call fail with `error`.
    pub(crate) fn fail_next(&self, error: ApiError) {
        self.backend.lock().unwrap().next_error = Some(error);
    }

    /// Hold every response until [Gate::release] is called.
    pub(crate) fn hold_responses(&self) -> Gate {
        self.hold.send_replace(true);

        Gate {
            hold: self.hold.clone(),
        }
    }

    /// Wait until `count` calls are being held.
    pub(crate) async fn wait_for_held(&self, count: usize) {
        while self.backend.lock().unwrap().held < count {
            tokio::task::yield_now().await;
        }
    }

    async fn respond<T>(
        &self,
        handle: impl FnOnce(&mut FakeBackend) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        // The response is decided when the request arrives, like a real server.
        let response = {
            let mut backend = self.backend.lock().unwrap();

            match backend.next_error.take() {
                Some(error) => Err(error),
                None => handle(&mut backend),
            }
        };

        let mut hold = self.hold.subscribe();

        if *hold.borrow() {
            self.backend.lock().unwrap().held += 1;
            hold.wait_for(|held| !held).await.unwrap();
            self.backend.lock().unwrap().held -= 1;
        }

        response
    }
}

impl TransactionsApi for FakeApi {
    async fn list(&self, _query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        self.respond(|backend| {
            backend.calls.list += 1;
            Ok(backend.transactions.clone())
        })
        .await
    }

    async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, ApiError> {
        self.respond(|backend| {
            backend.calls.create += 1;
            backend.next_id += 1;

            let transaction = draft_to_transaction(
                TransactionId::new(&format!("fake-{}", backend.next_id)),
                draft,
                OffsetDateTime::now_utc(),
            );
            backend.transactions.push(transaction.clone());

            Ok(transaction)
        })
        .await
    }

    async fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ApiError> {
        self.respond(|backend| {
            backend.calls.update += 1;

            let existing = backend
                .transactions
                .iter_mut()
                .find(|transaction| &transaction.id == id)
                .ok_or_else(|| ApiError::Rejected("No transaction found".to_owned()))?;
            *existing = draft_to_transaction(id.clone(), draft, existing.created_at);

            Ok(existing.clone())
        })
        .await
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
        self.respond(|backend| {
            backend.calls.delete += 1;

            let count = backend.transactions.len();
            backend.transactions.retain(|transaction| &transaction.id != id);

            if backend.transactions.len() == count {
                return Err(ApiError::Rejected("No transaction found".to_owned()));
            }

            Ok(())
        })
        .await
    }
}

fn draft_to_transaction(
    id: TransactionId,
    draft: &TransactionDraft,
    created_at: OffsetDateTime,
) -> Transaction {
    Transaction {
        id,
        title: draft.title.clone(),
        amount: draft.amount,
        kind: draft.kind,
        category: draft.category,
        date: draft.date,
        division: draft.division,
        note: draft.note.clone(),
        created_at,
    }
}

/// A lunch expense created on 2024-06-10 at 09:00 UTC.
pub(crate) fn sample_transaction(id: &str) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        title: "Lunch".to_owned(),
        amount: dec!(12.50),
        kind: TransactionKind::Expense,
        category: Category::Food,
        date: date!(2024 - 06 - 10),
        division: Division::Personal,
        note: None,
        created_at: datetime!(2024-06-10 09:00 UTC),
    }
}

/// A valid expense draft.
pub(crate) fn sample_draft() -> TransactionDraft {
    TransactionDraft {
        title: "Groceries".to_owned(),
        amount: dec!(45.20),
        kind: TransactionKind::Expense,
        category: Category::Food,
        date: date!(2024 - 06 - 11),
        division: Division::Personal,
        note: None,
    }
}
