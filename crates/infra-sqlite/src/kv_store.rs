// SQLite KeyValueStore Implementation
//
// Each trait method is a single SQL statement, so it is atomic under SQLite's
// write lock. Lists are rows ordered by `position`; the head holds the lowest
// position.

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use balanceq_core::error::Result;
use balanceq_core::port::storage::resolve_range;
use balanceq_core::port::KeyValueStore;
use sqlx::SqlitePool;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn list_push_back(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_lists (list_key, position, value)
            SELECT ?, COALESCE(MAX(position), 0) + 1, ?
            FROM kv_lists WHERE list_key = ?
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_push_front(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_lists (list_key, position, value)
            SELECT ?, COALESCE(MIN(position), 0) - 1, ?
            FROM kv_lists WHERE list_key = ?
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar(
            r#"
            DELETE FROM kv_lists
            WHERE id = (
                SELECT id FROM kv_lists
                WHERE list_key = ?
                ORDER BY position ASC
                LIMIT 1
            )
            RETURNING value
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_pop_front_n(&self, key: &str, count: u64) -> Result<Vec<String>> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);

        // RETURNING order is unspecified; restore head-first order
        let mut popped: Vec<(i64, String)> = sqlx::query_as(
            r#"
            DELETE FROM kv_lists
            WHERE id IN (
                SELECT id FROM kv_lists
                WHERE list_key = ?
                ORDER BY position ASC
                LIMIT ?
            )
            RETURNING position, value
            "#,
        )
        .bind(key)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        popped.sort_by_key(|(position, _)| *position);
        Ok(popped.into_iter().map(|(_, value)| value).collect())
    }

    async fn list_len(&self, key: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_lists WHERE list_key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let values: Vec<String> = sqlx::query_scalar(
            "SELECT value FROM kv_lists WHERE list_key = ? ORDER BY position ASC",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let range = resolve_range(values.len(), start, stop);
        Ok(values
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO kv_sets (set_key, member) VALUES (?, ?)")
            .bind(key)
            .bind(member)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_sets WHERE set_key = ? AND member = ?")
            .bind(key)
            .bind(member)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM kv_sets WHERE set_key = ? AND member = ?)",
        )
        .bind(key)
        .bind(member)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(found != 0)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT member FROM kv_sets WHERE set_key = ? ORDER BY member ASC")
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn get_scalar(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT value FROM kv_scalars WHERE scalar_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn set_scalar(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_scalars (scalar_key, value) VALUES (?, ?)
            ON CONFLICT(scalar_key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
