use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Category, CategoryId, Record, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store is already initialized for this load cycle")]
    AlreadyInitialized,
    #[error("record {0} not found")]
    NotFound(RecordId),
}

/// In-memory authoritative client-side cache of records and categories; the
/// single source of truth for rendering.
///
/// All mutations are serialized through the app's update loop, so the store
/// needs no internal concurrency control. Every record mutation is a full
/// replace-by-id, never a partial field write, which keeps the rollback
/// contract of the optimistic path simple and auditable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    records: Vec<Record>,
    categories: Vec<Category>,
    initialized: bool,
}

impl RecordStore {
    /// Replaces the store contents wholesale. Callable exactly once per load
    /// cycle; the caller only invokes this once *both* remote reads have
    /// succeeded, so the store is never left partially populated.
    pub fn initialize(
        &mut self,
        records: Vec<Record>,
        categories: Vec<Category>,
    ) -> Result<(), StoreError> {
        if self.initialized {
            return Err(StoreError::AlreadyInitialized);
        }
        self.records = records;
        self.categories = categories;
        self.initialized = true;
        Ok(())
    }

    /// Begins a new load cycle, discarding all cached state.
    pub fn reset(&mut self) {
        self.records.clear();
        self.categories.clear();
        self.initialized = false;
    }

    /// Atomically replaces the record with a matching id.
    pub fn replace(&mut self, id: &RecordId, new_record: Record) -> Result<(), StoreError> {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(slot) => {
                *slot = new_record;
                Ok(())
            }
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// All records in load (insertion) order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }
}
