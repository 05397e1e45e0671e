//! Result persistence.
//!
//! A [`ResultSet`] is stored as a JSON payload under a generated key, with
//! the record type and scan time duplicated into their own columns.

use std::path::Path;
use std::sync::Arc;

use sqlx::{Pool, Row, Sqlite};

use super::keygen::generate_key;
use super::migrations::run_migrations;
use super::pool::init_db_pool_with_path;
use crate::config::MAX_KEY_ATTEMPTS;
use crate::error_handling::DatabaseError;
use crate::models::ResultSet;

/// Saves and loads [`ResultSet`]s in SQLite.
#[derive(Clone)]
pub struct ResultStore {
    pool: Arc<Pool<Sqlite>>,
}

impl ResultStore {
    /// Opens (creating if needed) the database at `db_path` and applies migrations.
    pub async fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Stores `result` under a fresh key and returns the key.
    pub async fn save(&self, result: &ResultSet) -> Result<String, DatabaseError> {
        self.save_with(result, generate_key).await
    }

    /// Like [`save`](Self::save), drawing candidate keys from `next_key`.
    ///
    /// A key already in use is replaced by the next candidate, up to
    /// `MAX_KEY_ATTEMPTS` times.
    pub(crate) async fn save_with<F>(
        &self,
        result: &ResultSet,
        mut next_key: F,
    ) -> Result<String, DatabaseError>
    where
        F: FnMut() -> String,
    {
        let payload = serde_json::to_string(result)?;
        let created_at = chrono::Utc::now().timestamp_millis();

        for _ in 0..MAX_KEY_ATTEMPTS {
            let key = next_key();
            let inserted = sqlx::query(
                "INSERT INTO results (id, record_type, scan_time, created_at, payload)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO NOTHING",
            )
            .bind(&key)
            .bind(&result.record_type)
            .bind(&result.scan_timestamp)
            .bind(created_at)
            .bind(&payload)
            .execute(self.pool.as_ref())
            .await
            .map_err(DatabaseError::SqlError)?
            .rows_affected();

            if inserted == 1 {
                log::debug!("Stored {} answers under key {}", result.answers.len(), key);
                return Ok(key);
            }
            log::debug!("Result key {} already taken, generating another", key);
        }

        Err(DatabaseError::KeyExhausted(MAX_KEY_ATTEMPTS))
    }

    /// Loads the result stored under `key`.
    pub async fn load(&self, key: &str) -> Result<ResultSet, DatabaseError> {
        let row = sqlx::query("SELECT payload FROM results WHERE id = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(DatabaseError::SqlError)?
            .ok_or_else(|| DatabaseError::NotFound(key.to_string()))?;

        let payload: String = row.get("payload");
        Ok(serde_json::from_str(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerRecord, HostRequest, RecordType, RequestSet};
    use tempfile::TempDir;

    fn sample_result() -> ResultSet {
        let request = RequestSet::from_hosts(vec![HostRequest::new(
            "a.example",
            Some("10.0.0.1".to_string()),
        )]);
        ResultSet {
            request,
            answers: vec![AnswerRecord {
                query: "a.example".to_string(),
                want: Some("10.0.0.1".to_string()),
                record_type: RecordType::A,
                raw_values: vec!["10.0.0.1".to_string()],
                response_time_ms: Some(12.5),
                error: None,
                is_match: true,
            }],
            record_type: "A".to_string(),
            scan_timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    async fn open_store(dir: &TempDir) -> ResultStore {
        ResultStore::open(&dir.path().join("results.db"))
            .await
            .expect("Failed to open result store")
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let result = sample_result();

        let key = store.save(&result).await.unwrap();
        let loaded = store.load(&key).await.unwrap();

        assert_eq!(loaded, result);
    }

    #[tokio::test]
    async fn test_load_unknown_key() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let err = store.load("nosuchkey").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(ref k) if k == "nosuchkey"));
    }

    #[tokio::test]
    async fn test_colliding_key_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let result = sample_result();

        let first = store.save_with(&result, || "taken".to_string()).await.unwrap();
        assert_eq!(first, "taken");

        let mut candidates = vec!["fresh".to_string(), "taken".to_string()];
        let second = store
            .save_with(&result, || candidates.pop().unwrap_or_default())
            .await
            .unwrap();

        assert_eq!(second, "fresh");
        assert!(store.load("taken").await.is_ok());
        assert!(store.load("fresh").await.is_ok());
    }

    #[tokio::test]
    async fn test_key_space_exhausted() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let result = sample_result();
        store.save_with(&result, || "only".to_string()).await.unwrap();

        let err = store
            .save_with(&result, || "only".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::KeyExhausted(n) if n == MAX_KEY_ATTEMPTS));
    }

    #[tokio::test]
    async fn test_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let key = open_store(&dir).await.save(&sample_result()).await.unwrap();

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.load(&key).await.unwrap().answers.len(), 1);
    }
}
