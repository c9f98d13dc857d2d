//! Namespaced key-value store
//!
//! Values are raw bytes so a corrupted entry can still be read back and
//! handed to the decoder, which decides what to do with it.

use sqlx::SqlitePool;

/// Key-value storage scoped to one namespace
#[derive(Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
    namespace: String,
}

impl KeyValueStore {
    /// Create a store for `namespace` on the given connection pool
    pub fn new(pool: SqlitePool, namespace: &str) -> Self {
        Self {
            pool,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the value stored under `key`
    pub async fn get(&self, key: &str) -> sqlx::Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT value FROM kv_store WHERE namespace = ? AND key = ?")
                .bind(&self.namespace)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(v,)| v))
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn put(&self, key: &str, value: &[u8]) -> sqlx::Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (namespace, key, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
