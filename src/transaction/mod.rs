//! Recording and reading the session-scoped transaction ledger.
//!
//! The ledger is append-only: transactions are created and read, never
//! edited or deleted. Every operation is scoped to exactly one session
//! token; there is no cross-session read path.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod get_endpoint;
mod list_endpoint;
mod summary_endpoint;

pub use self::core::{
    Direction, NewTransaction, Transaction, create_transaction, get_transaction,
    list_transactions, summarize_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{ListTransactionsResponse, list_transactions_endpoint};
pub use summary_endpoint::{SummaryResponse, get_summary_endpoint};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
