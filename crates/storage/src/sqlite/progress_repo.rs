use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{ProgressBlob, ProgressRepository, StorageError, storage_key};
use academy_core::model::{ModuleId, ProgressRecord};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(
        &self,
        module_id: &ModuleId,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError> {
        let key = storage_key(self.namespace(), module_id);
        let row = sqlx::query(
            r"
            SELECT blob
            FROM academy_progress
            WHERE storage_key = ?1
            ",
        )
        .bind(&key)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(ProgressRecord::default_record(now));
        };

        let raw: String = row
            .try_get("blob")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(ProgressBlob::decode_or_default(&key, &raw, now))
    }

    async fn save(
        &self,
        module_id: &ModuleId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let key = storage_key(self.namespace(), module_id);
        let raw = ProgressBlob::from_record(record).encode()?;

        sqlx::query(
            r"
            INSERT INTO academy_progress (storage_key, blob, last_access)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(storage_key) DO UPDATE SET
                blob = excluded.blob,
                last_access = excluded.last_access
            ",
        )
        .bind(&key)
        .bind(&raw)
        .bind(record.last_access())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
