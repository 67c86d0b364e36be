//! Facade coordinating the in-memory sale list with its record store.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use sales_domain::SaleRecord;

use crate::{decode_records, encode_records, Clock, CoreError, RecordStore, SaleForm, SaleService};

/// Single-writer guard shared by every book bound to the same store.
///
/// A second save cannot start while a permit is alive.
#[derive(Debug, Default)]
pub struct WriteGate {
    busy: AtomicBool,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<WritePermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| WritePermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one save; releases the gate on drop.
#[derive(Debug)]
pub struct WritePermit<'a> {
    gate: &'a WriteGate,
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

type Listener = Box<dyn FnMut(&[SaleRecord]) + Send>;

/// Owns the working copy of the sale list for a session.
///
/// Writes are read-modify-write against the freshest stored list, and the working copy
/// is replaced only after the store confirms the save.
pub struct SalesBook {
    store: Arc<dyn RecordStore>,
    key: String,
    clock: Arc<dyn Clock>,
    gate: Arc<WriteGate>,
    records: Vec<SaleRecord>,
    listeners: Vec<Listener>,
}

impl SalesBook {
    pub fn new(store: Arc<dyn RecordStore>, key: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            key: key.into(),
            clock,
            gate: Arc::new(WriteGate::new()),
            records: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Shares an existing gate, so books over the same store never save concurrently.
    pub fn with_gate(mut self, gate: Arc<WriteGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> Arc<WriteGate> {
        Arc::clone(&self.gate)
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&SaleRecord> {
        SaleService::find(&self.records, id)
    }

    /// Registers a callback run with the new list after every confirmed save.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[SaleRecord]) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the working copy with the stored list.
    ///
    /// An unreadable store or a corrupt blob leaves the book empty instead of failing.
    pub fn reload(&mut self) -> &[SaleRecord] {
        self.records = match self.read_stored() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to load sales, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(key = %self.key, count = self.records.len(), "sales loaded");
        &self.records
    }

    /// Validates and persists a form submission, then commits it to the working copy.
    ///
    /// Returns the created or edited record. Validation and persistence failures leave
    /// the working copy untouched.
    pub fn submit(
        &mut self,
        form: &SaleForm,
        editing_id: Option<&str>,
    ) -> Result<SaleRecord, CoreError> {
        let gate = Arc::clone(&self.gate);
        let _permit = gate.try_acquire().ok_or(CoreError::WriteInProgress)?;

        let current = self.read_stored().map_err(CoreError::into_persistence)?;
        let next = SaleService::create_or_update(&current, form, editing_id, self.clock.as_ref())?;
        let blob = encode_records(&next)?;

        self.save_blob(&blob)?;

        let saved = match editing_id {
            Some(id) => SaleService::find(&next, id).cloned(),
            None => next.last().cloned(),
        }
        .ok_or_else(|| CoreError::Persistence("saved sale missing from list".into()))?;

        tracing::info!(key = %self.key, id = %saved.id, count = next.len(), "sales saved");
        self.records = next;
        self.notify();
        Ok(saved)
    }

    /// Overwrites the stored list wholesale, e.g. with the contents of a backup.
    ///
    /// Takes the same gate as [`SalesBook::submit`]; the working copy changes only once
    /// the store confirms the save.
    pub fn replace_all(&mut self, records: Vec<SaleRecord>) -> Result<&[SaleRecord], CoreError> {
        let gate = Arc::clone(&self.gate);
        let _permit = gate.try_acquire().ok_or(CoreError::WriteInProgress)?;

        let blob = encode_records(&records)?;
        self.save_blob(&blob)?;

        tracing::info!(key = %self.key, count = records.len(), "sales replaced");
        self.records = records;
        self.notify();
        Ok(&self.records)
    }

    fn save_blob(&self, blob: &str) -> Result<(), CoreError> {
        self.store.save(&self.key, blob).map_err(|err| {
            tracing::error!(key = %self.key, error = %err, "failed to save sales");
            err.into_persistence()
        })
    }

    fn read_stored(&self) -> Result<Vec<SaleRecord>, CoreError> {
        let Some(blob) = self.store.load(&self.key)? else {
            return Ok(Vec::new());
        };
        match decode_records(&blob) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "stored sales are corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn notify(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener(&self.records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, MemoryStore, DEFAULT_STORE_KEY};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn book_with(store: Arc<MemoryStore>) -> SalesBook {
        let clock = FixedClock(Utc.timestamp_millis_opt(1_757_000_000_000).unwrap());
        SalesBook::new(store, DEFAULT_STORE_KEY, Arc::new(clock))
    }

    fn crystal() -> SaleForm {
        SaleForm::new("Crystal", "3", "10,50", "05/09/2025")
    }

    #[test]
    fn failed_save_keeps_working_copy() {
        let store = Arc::new(MemoryStore::new());
        let mut book = book_with(Arc::clone(&store));
        book.submit(&crystal(), None).expect("first save");

        store.set_fail_writes(true);
        let err = book
            .submit(&SaleForm::new("Bonafont", "1", "2", "06/09/2025"), None)
            .expect_err("save must fail");
        assert!(matches!(err, CoreError::Persistence(_)), "unexpected: {err:?}");
        assert_eq!(book.records().len(), 1);
    }

    #[test]
    fn second_write_is_rejected_while_gate_is_held() {
        let store = Arc::new(MemoryStore::new());
        let mut book = book_with(store);
        let gate = book.gate();
        let permit = gate.try_acquire().expect("gate free");

        let err = book.submit(&crystal(), None).expect_err("gate busy");
        assert!(matches!(err, CoreError::WriteInProgress));
        assert!(book.records().is_empty());

        drop(permit);
        assert!(!gate.is_busy());
        book.submit(&crystal(), None).expect("gate released");
    }

    #[test]
    fn corrupt_blob_loads_as_empty() {
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORE_KEY, "{oops"));
        let mut book = book_with(store);
        assert!(book.reload().is_empty());
    }

    #[test]
    fn unreadable_store_loads_as_empty_but_blocks_writes() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_reads(true);
        let mut book = book_with(Arc::clone(&store));
        assert!(book.reload().is_empty());

        let err = book.submit(&crystal(), None).expect_err("read failure aborts write");
        assert!(matches!(err, CoreError::Persistence(_)));
        assert!(store.raw(DEFAULT_STORE_KEY).is_none());
    }

    #[test]
    fn submit_builds_on_the_stored_list() {
        let store = Arc::new(MemoryStore::new());
        let mut first = book_with(Arc::clone(&store));
        let mut second = book_with(Arc::clone(&store)).with_gate(first.gate());

        first.submit(&crystal(), None).unwrap();
        // `second` never reloaded, yet its write must not clobber the first sale.
        second
            .submit(&SaleForm::new("Bonafont", "1", "2", "06/09/2025"), None)
            .unwrap();

        assert_eq!(second.records().len(), 2);
        assert_eq!(first.reload().len(), 2);
    }

    #[test]
    fn listeners_see_each_confirmed_save() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(MemoryStore::new());
        let mut book = book_with(Arc::clone(&store));
        let sink = Arc::clone(&seen);
        book.subscribe(move |records| sink.lock().unwrap().push(records.len()));

        book.submit(&crystal(), None).unwrap();
        store.set_fail_writes(true);
        let _ = book.submit(&crystal(), None);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn replace_all_respects_the_write_gate() {
        let store = Arc::new(MemoryStore::new());
        let mut book = book_with(Arc::clone(&store));
        book.submit(&crystal(), None).unwrap();
        let before = store.raw(DEFAULT_STORE_KEY);

        let gate = book.gate();
        let permit = gate.try_acquire().expect("gate free");
        let err = book.replace_all(Vec::new()).expect_err("gate busy");
        assert!(matches!(err, CoreError::WriteInProgress));
        assert_eq!(store.raw(DEFAULT_STORE_KEY), before);
        assert_eq!(book.records().len(), 1);

        drop(permit);
        assert!(book.replace_all(Vec::new()).expect("gate released").is_empty());
        assert_eq!(store.raw(DEFAULT_STORE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn replace_all_notifies_only_after_a_confirmed_save() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(MemoryStore::new());
        let mut book = book_with(Arc::clone(&store));
        let sink = Arc::clone(&seen);
        book.subscribe(move |records| sink.lock().unwrap().push(records.len()));

        let restored = vec![SaleRecord::new("1", "Crystal", 1.0, 5.0, "05/09/2025")];
        store.set_fail_writes(true);
        assert!(book.replace_all(restored.clone()).is_err());
        assert!(book.records().is_empty());

        store.set_fail_writes(false);
        book.replace_all(restored).expect("replace");
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }
}
