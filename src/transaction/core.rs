//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, named_params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId, session::SessionId};

// ============================================================================
// MODELS
// ============================================================================

/// The caller-supplied intent of a transaction.
///
/// The direction is only used at creation time to derive the sign of the
/// stored amount. It is not persisted and never re-derived afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money flowing into the ledger. The stored amount keeps its sign.
    Credit,
    /// Money flowing out of the ledger. The stored amount is negated.
    Debit,
}

impl Direction {
    /// Derive the signed amount to store for a transaction of `amount` in
    /// this direction.
    pub fn signed_amount(self, amount: f64) -> f64 {
        match self {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }
}

/// A single signed money movement recorded against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Short text describing what the transaction was for.
    pub title: String,
    /// The signed amount of money moved: positive for credits, negative for
    /// debits.
    pub amount: f64,
    /// The session that owns this transaction.
    pub session_id: SessionId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated input for recording a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Short text describing what the transaction is for.
    pub title: String,
    /// The magnitude of the transaction as supplied by the caller.
    pub amount: f64,
    /// Whether the caller intends a credit or a debit.
    pub direction: Direction,
}

impl NewTransaction {
    /// The signed amount to persist: credits keep their sign, debits are
    /// negated.
    pub fn stored_amount(&self) -> f64 {
        self.direction.signed_amount(self.amount)
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// Record a new transaction against `session_id`.
///
/// The stored amount is derived from the direction at this point; it is
/// never recomputed after the row has been inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (id, title, amount, session_id, created_at)
             VALUES (:id, :title, :amount, :session_id, :created_at)
             RETURNING id, title, amount, session_id, created_at",
        )?
        .query_row(
            named_params! {
                ":id": TransactionId::new(),
                ":title": new_transaction.title,
                ":amount": new_transaction.stored_amount(),
                ":session_id": session_id,
                ":created_at": OffsetDateTime::now_utc(),
            },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction matching both `id` and `session_id`.
///
/// A row owned by another session is reported as not found so that callers
/// cannot learn whether a given ID exists outside their own session.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if no transaction matches both `id` and `session_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE id = :id AND session_id = :session_id",
        )?
        .query_row(
            named_params! { ":id": id, ":session_id": session_id },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transactions owned by `session_id` in storage order.
///
/// An empty vector is returned if the session has no transactions.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE session_id = :session_id",
        )?
        .query_map(
            named_params! { ":session_id": session_id },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Compute the net balance of `session_id`: the sum of the stored signed
/// amounts of exactly the transactions owned by that session.
///
/// A session with no transactions has a balance of zero.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn summarize_transactions(
    session_id: &SessionId,
    connection: &Connection,
) -> Result<f64, Error> {
    let amount = connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE session_id = :session_id",
        )?
        .query_row(named_params! { ":session_id": session_id }, |row| {
            row.get(0)
        })?;

    Ok(amount)
}

/// Map a database row to a [Transaction].
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        session_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}
