//! Database initialization for the transaction ledger.

use rusqlite::Connection;

/// Create the tables for the application's domain models.
///
/// The ledger is a single append-only table. Rows are only ever inserted,
/// never updated or deleted.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query is scoped by session, so the index covers all read paths.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS transactions_session_id ON transactions (session_id)",
        (),
    )?;

    Ok(())
}
