//! Defines the endpoint for listing the caller's transactions.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::SessionId,
    transaction::{
        TransactionState,
        core::{Transaction, list_transactions},
    },
};

/// The response body for listing transactions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    /// The caller's transactions in storage order.
    pub transactions: Vec<Transaction>,
}

/// A route handler for listing all of the caller's transactions.
///
/// Only rows owned by the caller's session are returned; there are no
/// filtering or pagination parameters.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<ListTransactionsResponse>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let transactions = list_transactions(&session_id, &connection)?;

    Ok(Json(ListTransactionsResponse { transactions }))
}
