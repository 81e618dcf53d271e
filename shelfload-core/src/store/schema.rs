use rusqlite::{Connection, OptionalExtension, Transaction};

use super::StoreError;

/// Schema version written by this build of the SQLite store.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the `authors` and `books` tables if they are missing.
///
/// Databases that already record a different schema version are rejected;
/// the loader never migrates.
pub(super) fn initialise_schema(connection: &mut Connection) -> Result<(), StoreError> {
    let transaction = connection
        .transaction()
        .map_err(|source| StoreError::Sqlite {
            operation: "begin schema transaction",
            source,
        })?;

    run_schema_step(
        &transaction,
        "create authors table",
        "CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY CHECK (length(id) > 0),
            name TEXT NOT NULL,
            personal_name TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_schema_step(
        &transaction,
        "create books table",
        "CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            published_date TEXT,
            cover_ids TEXT NOT NULL,
            author_ids TEXT NOT NULL,
            author_names TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    ensure_schema_version(&transaction)?;

    transaction.commit().map_err(|source| StoreError::Sqlite {
        operation: "commit schema transaction",
        source,
    })
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), StoreError> {
    run_schema_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS shelfload_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM shelfload_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| StoreError::Sqlite {
            operation: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(StoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO shelfload_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "record schema version",
                source,
            }),
    }
}

fn run_schema_step(
    transaction: &Transaction<'_>,
    operation: &'static str,
    sql: &str,
) -> Result<(), StoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| StoreError::Sqlite { operation, source })
}
