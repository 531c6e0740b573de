use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockbook_core::{ExpectedVersion, ItemRef};
use stockbook_ledger::StockRecord;

/// Stock store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain rejections (validation, business rules).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed (expected {expected}, actual {actual})")]
    Concurrency { expected: u64, actual: u64 },

    #[error("invalid write: {0}")]
    InvalidWrite(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator for stock records.
///
/// Implementations must:
/// - enforce optimistic concurrency against the currently stored version
/// - make `save_pair` all-or-nothing (both records or neither)
/// - never let a stored record's version regress
pub trait StockStore: Send + Sync {
    /// Load the current record for an item, if one exists.
    fn load(&self, item: &ItemRef) -> Result<Option<StockRecord>, StoreError>;

    /// Persist one record. `expected` is the version currently stored
    /// (0 for a record being created); the write is refused if it differs.
    fn save(&self, record: StockRecord, expected: ExpectedVersion)
    -> Result<StockRecord, StoreError>;

    /// Persist two records atomically, used by inter-variant transfers.
    /// Both version checks run before either write; on any failure neither
    /// record is touched.
    fn save_pair(
        &self,
        first: StockRecord,
        expected_first: ExpectedVersion,
        second: StockRecord,
        expected_second: ExpectedVersion,
    ) -> Result<(StockRecord, StockRecord), StoreError>;

    /// Every stored record, in no particular order.
    fn list(&self) -> Result<Vec<StockRecord>, StoreError>;
}

impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    fn load(&self, item: &ItemRef) -> Result<Option<StockRecord>, StoreError> {
        (**self).load(item)
    }

    fn save(
        &self,
        record: StockRecord,
        expected: ExpectedVersion,
    ) -> Result<StockRecord, StoreError> {
        (**self).save(record, expected)
    }

    fn save_pair(
        &self,
        first: StockRecord,
        expected_first: ExpectedVersion,
        second: StockRecord,
        expected_second: ExpectedVersion,
    ) -> Result<(StockRecord, StockRecord), StoreError> {
        (**self).save_pair(first, expected_first, second, expected_second)
    }

    fn list(&self) -> Result<Vec<StockRecord>, StoreError> {
        (**self).list()
    }
}

/// In-memory stock store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    records: RwLock<HashMap<ItemRef, StockRecord>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_write(
        records: &HashMap<ItemRef, StockRecord>,
        record: &StockRecord,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        let current = records.get(&record.item()).map(|r| r.version()).unwrap_or(0);

        if !expected.matches(current) {
            let expected = match expected {
                ExpectedVersion::Exact(v) => v,
                ExpectedVersion::Any => current,
            };
            return Err(StoreError::Concurrency {
                expected,
                actual: current,
            });
        }

        if record.version() <= current {
            return Err(StoreError::InvalidWrite(format!(
                "version must increase (stored {current}, attempted {})",
                record.version()
            )));
        }

        Ok(())
    }
}

impl StockStore for InMemoryStockStore {
    fn load(&self, item: &ItemRef) -> Result<Option<StockRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(records.get(item).cloned())
    }

    fn save(
        &self,
        record: StockRecord,
        expected: ExpectedVersion,
    ) -> Result<StockRecord, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Self::check_write(&records, &record, expected)?;
        records.insert(record.item(), record.clone());
        Ok(record)
    }

    fn save_pair(
        &self,
        first: StockRecord,
        expected_first: ExpectedVersion,
        second: StockRecord,
        expected_second: ExpectedVersion,
    ) -> Result<(StockRecord, StockRecord), StoreError> {
        if first.item() == second.item() {
            return Err(StoreError::InvalidWrite(
                "save_pair requires two distinct items".to_string(),
            ));
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        // Both checks before either write: all-or-nothing.
        Self::check_write(&records, &first, expected_first)?;
        Self::check_write(&records, &second, expected_second)?;

        records.insert(first.item(), first.clone());
        records.insert(second.item(), second.clone());
        Ok((first, second))
    }

    fn list(&self) -> Result<Vec<StockRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(records.values().cloned().collect())
    }
}
