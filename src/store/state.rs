//! The client-local mirror of the transaction collection and the pure
//! transition function that updates it.

use crate::transaction::{Transaction, TransactionId};

/// Everything the presentation layer can observe about the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// The last known server state of the transaction collection.
    pub transactions: Vec<Transaction>,
    /// The message of the most recent failed operation, cleared by a successful load.
    pub error: Option<String>,
    /// The number of requests that have been issued but not yet settled.
    pub pending_requests: usize,
}

/// A change to apply to [StoreState], derived from a request being issued or
/// a response from the remote API.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A request was issued to the remote API.
    RequestStarted,
    /// The remote API returned the full collection.
    Loaded(Vec<Transaction>),
    /// The remote API created a transaction.
    Added(Transaction),
    /// The remote API replaced a transaction.
    Updated(Transaction),
    /// The remote API deleted a transaction.
    Removed(TransactionId),
    /// A request failed with a message for the user.
    Failed(String),
    /// A response arrived that must not be applied, e.g. an outdated load.
    Discarded,
}

impl StoreState {
    /// Whether a request is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }

    /// Find a transaction by its ID.
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| &transaction.id == id)
    }

    /// Map the current state and a command to the next state.
    ///
    /// Every command other than [Command::RequestStarted] settles one pending
    /// request. A failure never touches the collection.
    pub fn apply(mut self, command: Command) -> Self {
        match command {
            Command::RequestStarted => {
                self.pending_requests += 1;
                return self;
            }
            Command::Loaded(transactions) => {
                self.transactions = transactions;
                self.error = None;
            }
            Command::Added(transaction) => {
                // The server is the source of truth for IDs, so a record we
                // already hold is replaced rather than duplicated.
                match self.transactions.iter_mut().find(|t| t.id == transaction.id) {
                    Some(existing) => *existing = transaction,
                    None => self.transactions.push(transaction),
                }
            }
            Command::Updated(transaction) => {
                if let Some(existing) = self
                    .transactions
                    .iter_mut()
                    .find(|existing| existing.id == transaction.id)
                {
                    *existing = transaction;
                }
            }
            Command::Removed(id) => {
                self.transactions.retain(|transaction| transaction.id != id);
            }
            Command::Failed(message) => {
                self.error = Some(message);
            }
            Command::Discarded => {}
        }

        self.pending_requests = self.pending_requests.saturating_sub(1);
        self
    }
}
