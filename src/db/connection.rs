use crate::error::Error;
use rusqlite::Connection;
use std::path::Path;

/// Bumping this discards every stored transaction the next time the
/// database is opened.
pub const SCHEMA_VERSION: i32 = 2;

const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    amount REAL NOT NULL,
    description TEXT,
    type TEXT NOT NULL,
    date TEXT NOT NULL,
    credit_detail TEXT,
    debit_detail TEXT,
    created_at TEXT NOT NULL
)";

pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let conn = Connection::open(path.as_ref())?;
    tracing::debug!("Opened database at {}", path.as_ref().display());
    ensure_schema(&conn, SCHEMA_VERSION)?;
    Ok(conn)
}

/// Creates the transactions table, or drops and recreates it when the stored
/// schema version differs from `version`.
pub fn ensure_schema(conn: &Connection, version: i32) -> Result<(), Error> {
    let stored_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if stored_version == version {
        return Ok(());
    }

    if stored_version != 0 {
        tracing::warn!(
            "Schema version changed from {} to {}, discarding all stored transactions",
            stored_version,
            version
        );
    }

    conn.execute("DROP TABLE IF EXISTS transactions", [])?;
    conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
    conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
    tracing::info!("Created transactions table (schema version {})", version);

    Ok(())
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection, Error> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn, SCHEMA_VERSION)?;
    Ok(conn)
}
