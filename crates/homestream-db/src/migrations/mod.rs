//! Embedded schema migrations, applied in order when a pool is built.

use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {version} ({name}) failed: {source}")]
    Failed {
        version: usize,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// `(version, name, sql)` in application order.
const MIGRATIONS: &[(usize, &str, &str)] = &[
    (1, "initial", include_str!("001_initial.sql")),
    (2, "watch_progress", include_str!("002_watch_progress.sql")),
];

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Apply every migration newer than the highest recorded version.
///
/// A migration and its ledger row commit together, so a failure leaves the
/// schema at the last good version. Returns the number applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(LEDGER_DDL)?;

    let recorded: usize = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    let mut applied = 0;
    for &(version, name, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > recorded) {
        let failed = move |source| MigrationError::Failed {
            version,
            name,
            source,
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        tracing::info!(version, name, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}
