use std::{
    collections::BTreeMap,
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

use super::{RecordId, Store, Transaction};
use crate::{
    error::{GenerationError, Result},
    seed::Payload,
};

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("transaction already finished")]
    Finished,
}

impl From<MemoryStoreError> for GenerationError {
    fn from(value: MemoryStoreError) -> Self {
        GenerationError::persistence(value)
    }
}

/// A committed row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: RecordId,
    pub fields: Payload,
}

/// In-memory table store.
///
/// Transactions stage their inserts privately and publish them under a single
/// write lock on commit, so readers never observe a partial graph. Keys are
/// allocated eagerly and are not reused after a rollback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<StoredRow>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows of `entity`, in insertion order.
    pub fn rows(&self, entity: &str) -> Result<Vec<StoredRow>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| MemoryStoreError::LockPoisoned)?;
        Ok(tables.get(entity).cloned().unwrap_or_default())
    }

    pub fn count(&self, entity: &str) -> Result<usize> {
        let tables = self
            .tables
            .read()
            .map_err(|_| MemoryStoreError::LockPoisoned)?;
        Ok(tables.get(entity).map_or(0, Vec::len))
    }

    /// `true` if no row of any entity has been committed.
    pub fn is_empty(&self) -> Result<bool> {
        let tables = self
            .tables
            .read()
            .map_err(|_| MemoryStoreError::LockPoisoned)?;
        Ok(tables.values().all(Vec::is_empty))
    }

    fn allocate(&self) -> RecordId {
        RecordId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl Store for MemoryStore {
    type Tx<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<Self::Tx<'_>> {
        Ok(MemoryTransaction {
            store: self,
            staged: Vec::new(),
            finished: false,
        })
    }
}

/// Write scope over a [`MemoryStore`]. Dropping it unfinished discards the
/// staged rows.
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    staged: Vec<(String, StoredRow)>,
    finished: bool,
}

impl Transaction for MemoryTransaction<'_> {
    fn insert(&mut self, entity: &str, fields: &Payload) -> Result<RecordId> {
        if self.finished {
            return Err(MemoryStoreError::Finished.into());
        }

        let id = self.store.allocate();
        self.staged.push((
            entity.to_owned(),
            StoredRow {
                id,
                fields: fields.clone(),
            },
        ));
        Ok(id)
    }

    fn commit(mut self) -> Result<()> {
        let mut tables = self
            .store
            .tables
            .write()
            .map_err(|_| MemoryStoreError::LockPoisoned)?;

        for (entity, row) in self.staged.drain(..) {
            tables.entry(entity).or_default().push(row);
        }
        self.finished = true;
        Ok(())
    }

    fn rollback(mut self) -> Result<()> {
        debug!(discarded = self.staged.len(), "rolling back transaction");
        self.staged.clear();
        self.finished = true;
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.staged.is_empty() {
            debug!(
                discarded = self.staged.len(),
                "transaction dropped without commit"
            );
        }
    }
}
