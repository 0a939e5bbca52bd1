use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

use academy_core::model::{ModuleId, ProgressRecord, StepId};

/// Errors surfaced by storage adapters.
///
/// Parse failures of previously stored blobs are deliberately NOT represented
/// here: a corrupt blob degrades to the default record (with a warning)
/// instead of erroring, so the UI layer never sees it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Namespace prefix used by the hosting platform's storage keys.
pub const DEFAULT_NAMESPACE: &str = "lusotown";

/// Storage key for one module's progress entry:
/// `"<namespace>-academy-<moduleId>-progress"`.
#[must_use]
pub fn storage_key(namespace: &str, module_id: &ModuleId) -> String {
    format!("{namespace}-academy-{module_id}-progress")
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

/// Persisted shape of a progress record.
///
/// This mirrors the domain `ProgressRecord` so repositories can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer. Every field defaults: older entries that carry only
/// `completedSteps`/`lastAccess` still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressBlob {
    pub current_step_index: usize,
    pub completed_steps: Vec<String>,
    pub interactive_state: BTreeMap<String, bool>,
    /// Epoch milliseconds, as the original store recorded `Date.now()`.
    pub last_access: i64,
}

impl ProgressBlob {
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            current_step_index: record.current_step_index(),
            completed_steps: record
                .completed()
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            interactive_state: record.interactive().clone(),
            last_access: record.last_access().timestamp_millis(),
        }
    }

    /// Convert the blob back into a domain record.
    ///
    /// Entries that fail slug validation are dropped with a warning rather
    /// than failing the whole load; `now` backstops an unrepresentable
    /// timestamp.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> ProgressRecord {
        let mut completed = BTreeSet::new();
        for raw in self.completed_steps {
            match StepId::new(raw.clone()) {
                Ok(id) => {
                    completed.insert(id);
                }
                Err(_) => warn!(step = %raw, "dropping invalid step id from stored progress"),
            }
        }
        let last_access = DateTime::<Utc>::from_timestamp_millis(self.last_access)
            .filter(|_| self.last_access > 0)
            .unwrap_or(now);
        ProgressRecord::from_persisted(
            self.current_step_index,
            completed,
            self.interactive_state,
            last_access,
        )
    }

    /// Parse a stored blob, degrading to the default empty record on corrupt
    /// JSON. Logs a warning; never returns the parse error.
    #[must_use]
    pub fn decode_or_default(key: &str, raw: &str, now: DateTime<Utc>) -> ProgressRecord {
        match serde_json::from_str::<ProgressBlob>(raw) {
            Ok(blob) => blob.into_record(now),
            Err(err) => {
                warn!(%key, %err, "corrupt progress entry; using default record");
                ProgressRecord::default_record(now)
            }
        }
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

//
// ─── REPOSITORY CONTRACT ───────────────────────────────────────────────────────
//

/// Repository contract for per-module progress records.
///
/// `load` of a module with no stored entry returns the default empty record;
/// records are created implicitly on first save. Concurrent writers to the
/// same key are not guarded: the last writer wins, which matches the
/// single-active-tab model this store was designed for.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the progress record for a module, or the default record if none
    /// is stored (or the stored entry is corrupt). `now` stamps the default.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures (connection etc.),
    /// never for missing or malformed entries.
    async fn load(
        &self,
        module_id: &ModuleId,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError>;

    /// Overwrite the full record for a module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(
        &self,
        module_id: &ModuleId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository for testing and prototyping.
///
/// Holds serialized blobs keyed by storage key, which makes it a faithful
/// stand-in for the browser key-value store the original persisted to.
#[derive(Clone)]
pub struct InMemoryProgressRepository {
    namespace: String,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl Default for InMemoryProgressRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProgressRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert a raw entry under a module's storage key, bypassing
    /// serialization. Used by tests to simulate corrupt stored data.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, module_id: &ModuleId, raw: &str) -> Result<(), StorageError> {
        let key = storage_key(&self.namespace, module_id);
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, raw.to_owned());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn load(
        &self,
        module_id: &ModuleId,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError> {
        let key = storage_key(&self.namespace, module_id);
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(match guard.get(&key) {
            Some(raw) => ProgressBlob::decode_or_default(&key, raw, now),
            None => ProgressRecord::default_record(now),
        })
    }

    async fn save(
        &self,
        module_id: &ModuleId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let key = storage_key(&self.namespace, module_id);
        let raw = ProgressBlob::from_record(record).encode()?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, raw);
        Ok(())
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryProgressRepository::new());
        Self { progress }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
