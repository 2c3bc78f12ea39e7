//! Per-client key/value storage.
//!
//! Every write is a single statement, so an item is either fully written or absent.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Browser-style `localStorage`, one namespace per client id.
#[derive(Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read an item.
    #[cfg(test)]
    pub async fn get_item(&self, client_id: &str, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE client_id = ? AND key = ?")
            .bind(client_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Write an item, replacing any previous value.
    pub async fn set_item(&self, client_id: &str, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO local_storage (client_id, key, value, updated_at) VALUES (?, ?, ?, ?)
               ON CONFLICT(client_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(client_id)
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove an item. Removing a missing item is not an error.
    pub async fn remove_item(&self, client_id: &str, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM local_storage WHERE client_id = ? AND key = ?")
            .bind(client_id)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All `(client_id, value)` pairs stored under `key`.
    pub async fn entries(&self, key: &str) -> Result<Vec<(String, String)>, AppError> {
        let rows =
            sqlx::query("SELECT client_id, value FROM local_storage WHERE key = ? ORDER BY client_id")
                .bind(key)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("client_id"), row.get("value")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("ls.sqlite"))
            .await
            .unwrap();
        (LocalStorage::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let (storage, _dir) = storage().await;

        assert_eq!(storage.get_item("tab-a", "currentUser").await.unwrap(), None);

        storage.set_item("tab-a", "currentUser", "{}").await.unwrap();
        assert_eq!(
            storage.get_item("tab-a", "currentUser").await.unwrap(),
            Some("{}".to_string())
        );

        storage.set_item("tab-a", "currentUser", "[1]").await.unwrap();
        assert_eq!(
            storage.get_item("tab-a", "currentUser").await.unwrap(),
            Some("[1]".to_string())
        );

        storage.remove_item("tab-a", "currentUser").await.unwrap();
        assert_eq!(storage.get_item("tab-a", "currentUser").await.unwrap(), None);

        // Removing again is a no-op
        storage.remove_item("tab-a", "currentUser").await.unwrap();
    }

    #[tokio::test]
    async fn test_clients_are_isolated() {
        let (storage, _dir) = storage().await;

        storage.set_item("tab-a", "currentUser", "a").await.unwrap();
        storage.set_item("tab-b", "currentUser", "b").await.unwrap();
        storage.set_item("tab-b", "theme", "dark").await.unwrap();

        assert_eq!(
            storage.get_item("tab-a", "currentUser").await.unwrap(),
            Some("a".to_string())
        );

        let entries = storage.entries("currentUser").await.unwrap();
        assert_eq!(
            entries,
            vec![
                ("tab-a".to_string(), "a".to_string()),
                ("tab-b".to_string(), "b".to_string()),
            ]
        );
    }
}
