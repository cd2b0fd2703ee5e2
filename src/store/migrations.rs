//! Schema versions of the libSQL form store.
//!
//! `schema_version` records every applied step. Opening a database applies
//! the pending steps in order, each in its own transaction, and refuses a
//! database written by a newer build.

use libsql::Connection;

use crate::error::StoreError;

struct SchemaStep {
    version: i64,
    label: &'static str,
    sql: &'static str,
}

/// Append only.
static SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "settings_table",
    sql: "CREATE TABLE IF NOT EXISTS settings (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL
          );",
}];

/// Newest schema version this build knows how to write.
pub fn latest_version() -> i64 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Apply every pending schema step.
pub async fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            label TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )
    .await
    .map_err(|e| StoreError::Migration(format!("schema_version table: {e}")))?;

    let current = get_current_version(conn).await?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::Migration(format!(
            "database schema v{current} is newer than this build (v{latest})"
        )));
    }

    for step in SCHEMA_STEPS.iter().filter(|s| s.version > current) {
        apply(conn, step).await?;
        tracing::info!(version = step.version, label = step.label, "Form store schema upgraded");
    }
    Ok(())
}

async fn apply(conn: &Connection, step: &SchemaStep) -> Result<(), StoreError> {
    let batch = format!(
        "BEGIN;
         {}
         INSERT INTO schema_version (version, label) VALUES ({}, '{}');
         COMMIT;",
        step.sql, step.version, step.label
    );
    if let Err(e) = conn.execute_batch(&batch).await {
        if let Err(rollback) = conn.execute("ROLLBACK", ()).await {
            tracing::warn!(version = step.version, error = %rollback, "Rollback after failed schema step failed");
        }
        return Err(StoreError::Migration(format!(
            "schema v{} ({}): {e}",
            step.version, step.label
        )));
    }
    Ok(())
}

/// Highest applied version, 0 for a fresh database.
async fn get_current_version(conn: &Connection) -> Result<i64, StoreError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await
        .map_err(|e| StoreError::Migration(format!("read schema version: {e}")))?;

    match rows.next().await {
        Ok(Some(row)) => row
            .get::<i64>(0)
            .map_err(|e| StoreError::Migration(format!("read schema version: {e}"))),
        Ok(None) => Ok(0),
        Err(e) => Err(StoreError::Migration(format!("read schema version: {e}"))),
    }
}
