//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;
use serde_json::Value;
use time::Duration;

use crate::{
    AppState, Error,
    session::resolve_or_mint_session,
    transaction::core::{Direction, NewTransaction, create_transaction},
};

/// The state needed to record a new transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The validity window for freshly minted session cookies.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

/// Validate the request body for recording a transaction.
///
/// The checks are deliberately minimal: a non-empty string title, a numeric
/// amount of any finite magnitude, and one of the two recognized directions.
///
/// # Errors
/// Returns an [Error::Validation] describing the first malformed field.
pub(crate) fn parse_create_transaction(body: &Value) -> Result<NewTransaction, Error> {
    let title = body
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Validation("'title' must be a string".to_owned()))?;

    if title.is_empty() {
        return Err(Error::Validation("'title' must not be empty".to_owned()));
    }

    let amount = body
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::Validation("'amount' must be a number".to_owned()))?;

    let direction = match body.get("direction").and_then(Value::as_str) {
        Some("credit") => Direction::Credit,
        Some("debit") => Direction::Debit,
        _ => {
            return Err(Error::Validation(
                "'direction' must be either 'credit' or 'debit'".to_owned(),
            ));
        }
    };

    Ok(NewTransaction {
        title: title.to_owned(),
        amount,
        direction,
    })
}

/// A route handler for recording a new transaction.
///
/// The caller's session token is reused when presented; otherwise a new one
/// is minted and sent back as a cookie. This is the only route that may
/// bootstrap a session, so it is not wrapped by the session guard.
///
/// Responds with 201 Created and no body on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    jar: CookieJar,
    Json(body): Json<Value>,
) -> Result<(CookieJar, StatusCode), Error> {
    let new_transaction = parse_create_transaction(&body)?;

    let (jar, session_id) = resolve_or_mint_session(jar, state.cookie_duration);

    let connection = state.db_connection.lock().unwrap();
    create_transaction(new_transaction, &session_id, &connection)?;

    Ok((jar, StatusCode::CREATED))
}

#[cfg(test)]
mod create_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        body::Body,
        extract::State,
        http::{Response, StatusCode, header::SET_COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::cookie::{Cookie, CookieJar};
    use rusqlite::Connection;
    use serde_json::json;
    use time::Duration;

    use crate::{
        db::initialize,
        session::{COOKIE_SESSION, SessionId},
        transaction::core::list_transactions,
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            cookie_duration: Duration::days(7),
        }
    }

    async fn post_transaction(
        state: CreateTransactionState,
        jar: CookieJar,
        body: serde_json::Value,
    ) -> Response<Body> {
        create_transaction_endpoint(State(state), jar, Json(body))
            .await
            .into_response()
    }

    #[tokio::test]
    async fn creates_transaction_and_mints_session_cookie() {
        let state = get_test_state();

        let response = post_transaction(
            state.clone(),
            CookieJar::new(),
            json!({"title": "Salary", "amount": 5000, "direction": "credit"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("expected a session cookie to be set")
            .to_str()
            .unwrap();
        let cookie = Cookie::parse(set_cookie.to_owned()).unwrap();
        assert_eq!(cookie.name(), COOKIE_SESSION);
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        assert_eq!(cookie.path(), Some("/"));

        let connection = state.db_connection.lock().unwrap();
        let session_id = SessionId::from_token(cookie.value());
        let transactions = list_transactions(&session_id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Salary");
        assert_eq!(transactions[0].amount, 5000.0);
    }

    #[tokio::test]
    async fn reuses_presented_session_cookie() {
        let state = get_test_state();
        let session_id = SessionId::mint();
        let jar = CookieJar::new().add(Cookie::new(COOKIE_SESSION, session_id.to_string()));

        let response = post_transaction(
            state.clone(),
            jar,
            json!({"title": "Rent", "amount": 1200, "direction": "debit"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(
            response.headers().get(SET_COOKIE).is_none(),
            "an existing session token must not be overwritten"
        );

        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(&session_id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, -1200.0);
    }

    #[tokio::test]
    async fn rejects_invalid_bodies_without_touching_the_store() {
        let state = get_test_state();
        let invalid_bodies = [
            json!({"amount": 100, "direction": "credit"}),
            json!({"title": 42, "amount": 100, "direction": "credit"}),
            json!({"title": "", "amount": 100, "direction": "credit"}),
            json!({"title": "Salary", "direction": "credit"}),
            json!({"title": "Salary", "amount": "lots", "direction": "credit"}),
            json!({"title": "Salary", "amount": 100}),
            json!({"title": "Salary", "amount": 100, "direction": "transfer"}),
        ];

        for body in invalid_bodies {
            let response = post_transaction(state.clone(), CookieJar::new(), body.clone()).await;

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "body {body} should be rejected"
            );
        }

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
