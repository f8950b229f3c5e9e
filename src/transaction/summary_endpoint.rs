//! Defines the endpoint for the net balance of the caller's session.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::SessionId,
    transaction::{TransactionState, core::summarize_transactions},
};

/// The net balance of a session.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The sum of the signed amounts of the session's transactions.
    ///
    /// Zero for a session with no transactions.
    pub amount: f64,
}

/// A route handler for computing the caller's running balance.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_summary_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let amount = summarize_transactions(&session_id, &connection)?;

    Ok(Json(SummaryResponse { amount }))
}
