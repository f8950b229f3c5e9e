//! Application router configuration with gated and ungated route definitions.

use axum::{
    Router,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState, Error, endpoints,
    session::session_guard,
    transaction::{
        create_transaction_endpoint, get_summary_endpoint, get_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let gated_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .layer(middleware::from_fn(session_guard));

    // Creating a transaction is the only operation that may bootstrap a new
    // session, so it bypasses the session guard.
    let ungated_routes =
        Router::new().route(endpoints::TRANSACTIONS, post(create_transaction_endpoint));

    gated_routes
        .merge(ungated_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Get a JSON 404 response for routes that do not exist.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
