//! libSQL backend for `KeyValueStore`.
//!
//! Keeps one row per key in a `settings` table. Supports local file and
//! in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::KeyValueStore;

/// libSQL key-value store.
///
/// Holds a single connection reused for all operations.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(store.conn()).await?;
        info!(path = %path.display(), "Form store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to create in-memory database: {e}")))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(store.conn()).await?;
        Ok(store)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Backend(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// When `key` was last written.
    pub async fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT updated_at FROM settings WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Backend(format!("updated_at: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let raw: String = row
                    .get(0)
                    .map_err(|e| StoreError::Backend(format!("updated_at: {e}")))?;
                Ok(DateTime::parse_from_rfc3339(&raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(format!("updated_at: {e}"))),
        }
    }
}

#[async_trait]
impl KeyValueStore for LibSqlStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT value FROM settings WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Backend(format!("get: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: serde_json::Value =
                    serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(format!("get: {e}"))),
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value_str, now],
            )
            .await
            .map_err(|e| StoreError::Backend(format!("set: {e}")))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let count = self
            .conn()
            .execute("DELETE FROM settings WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Backend(format!("delete: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> LibSqlStore {
        LibSqlStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn settings_crud() {
        let store = test_store().await;
        let value = serde_json::json!({"business": {"name": "Acme"}});

        store.set("signup", &value).await.unwrap();
        let fetched = store.get("signup").await.unwrap().unwrap();
        assert_eq!(fetched["business"]["name"], "Acme");
        assert!(store.updated_at("signup").await.unwrap().is_some());

        let updated = serde_json::json!({"business": {"name": "Globex"}});
        store.set("signup", &updated).await.unwrap();
        let fetched = store.get("signup").await.unwrap().unwrap();
        assert_eq!(fetched["business"]["name"], "Globex");

        assert!(store.delete("signup").await.unwrap());
        assert!(store.get("signup").await.unwrap().is_none());
        assert!(!store.delete("signup").await.unwrap());
    }

    #[tokio::test]
    async fn unparseable_value_reads_as_null() {
        let store = test_store().await;
        store
            .conn()
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES ('signup', '{not json', 'x')",
                (),
            )
            .await
            .unwrap();

        let fetched = store.get("signup").await.unwrap();
        assert_eq!(fetched, Some(serde_json::Value::Null));
        assert!(store.updated_at("signup").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("signup.db");

        {
            let store = LibSqlStore::new_local(&path).await.unwrap();
            store
                .set("signup", &serde_json::json!({"step": "kept"}))
                .await
                .unwrap();
        }

        let reopened = LibSqlStore::new_local(&path).await.unwrap();
        let fetched = reopened.get("signup").await.unwrap().unwrap();
        assert_eq!(fetched["step"], "kept");
    }
}
