//! Defines the endpoint for retrieving a single transaction by its ID.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    database_id::TransactionId,
    session::SessionId,
    transaction::{
        TransactionState,
        core::{Transaction, get_transaction},
    },
};

/// Validate that `text` is a syntactically valid transaction ID.
///
/// # Errors
/// Returns an [Error::Validation] if `text` does not parse as a UUID.
pub(crate) fn parse_transaction_id(text: &str) -> Result<TransactionId, Error> {
    TransactionId::parse(text)
        .map_err(|_| Error::Validation(format!("'{text}' is not a valid transaction ID")))
}

/// A route handler for retrieving one of the caller's transactions.
///
/// Responds with 404 both when the ID does not exist and when it belongs to
/// another session, so that callers cannot probe for other sessions' rows.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = get_transaction(transaction_id, &session_id, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod get_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        database_id::TransactionId,
        db::initialize,
        session::SessionId,
        transaction::{
            TransactionState,
            core::{Direction, NewTransaction, Transaction, create_transaction},
        },
    };

    use super::get_transaction_endpoint;

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_transaction(state: &TransactionState, session_id: &SessionId) -> Transaction {
        let connection = state.db_connection.lock().unwrap();

        create_transaction(
            NewTransaction {
                title: "Salary".to_owned(),
                amount: 5000.0,
                direction: Direction::Credit,
            },
            session_id,
            &connection,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_own_transaction() {
        let state = get_test_state();
        let session_id = SessionId::mint();
        let created = insert_transaction(&state, &session_id);

        let Json(got) = get_transaction_endpoint(
            State(state),
            Extension(session_id),
            Path(created.id.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn rejects_malformed_transaction_id() {
        let state = get_test_state();

        let result = get_transaction_endpoint(
            State(state),
            Extension(SessionId::mint()),
            Path("not-a-uuid".to_owned()),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(
                "'not-a-uuid' is not a valid transaction ID".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn other_sessions_transaction_is_not_found() {
        let state = get_test_state();
        let owner = SessionId::mint();
        let created = insert_transaction(&state, &owner);

        let result = get_transaction_endpoint(
            State(state),
            Extension(SessionId::mint()),
            Path(created.id.to_string()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn nonexistent_transaction_is_not_found() {
        let state = get_test_state();

        let result = get_transaction_endpoint(
            State(state),
            Extension(SessionId::mint()),
            Path(TransactionId::new().to_string()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
