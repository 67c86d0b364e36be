use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use sales_domain::SaleRecord;

use crate::CoreError;

/// Key under which the sale list is persisted by default.
pub const DEFAULT_STORE_KEY: &str = "vendas";

/// Key-value persistence boundary holding one serialized blob per key.
///
/// Saves always replace the whole blob; there are no partial writes.
pub trait RecordStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` when nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Serializes the full sale list into the stored JSON array form.
pub fn encode_records(records: &[SaleRecord]) -> Result<String, CoreError> {
    serde_json::to_string(records).map_err(|err| CoreError::Serde(err.to_string()))
}

pub fn decode_records(blob: &str) -> Result<Vec<SaleRecord>, CoreError> {
    serde_json::from_str(blob).map_err(|err| CoreError::Serde(err.to_string()))
}

/// In-process store, used by tests and as a scratch backend.
///
/// Reads and writes can be switched to fail to exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw blob currently held under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence(format!("read of `{key}` refused")));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Persistence("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence(format!("write of `{key}` refused")));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Persistence("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
