//! Ledger of in-flight optimistic country writes.
//!
//! Each inline country change is an independent transaction: it captures its
//! own pre-image of exactly the fields it touches at call time, and on
//! failure rolls back only that delta as a compensating replace. Overlapping
//! writes to the same record therefore never revert each other's work; the
//! last write to land (success or rollback) determines the visible state.

use std::collections::HashMap;

use crate::model::{Category, CategoryId, MutationId, Record, RecordId};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryMutation {
    pub mutation_id: MutationId,
    pub record_id: RecordId,
    pub previous_country: String,
    pub previous_country_id: Option<CategoryId>,
    pub new_country: String,
    pub new_country_id: CategoryId,
    pub started_at_ms: u64,
}

impl CountryMutation {
    #[must_use]
    pub fn new(previous: &Record, category: &Category, now_ms: u64) -> Self {
        Self {
            mutation_id: MutationId::generate(),
            record_id: previous.id.clone(),
            previous_country: previous.country.clone(),
            previous_country_id: previous.country_id.clone(),
            new_country: category.name.clone(),
            new_country_id: category.id.clone(),
            started_at_ms: now_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationLedger {
    pending: HashMap<MutationId, CountryMutation>,
}

impl MutationLedger {
    /// Captures the pre-image for one country change and registers it as
    /// pending. The returned id travels with the remote write and comes back
    /// with its completion event.
    pub fn begin(&mut self, previous: &Record, category: &Category, now_ms: u64) -> MutationId {
        let mutation = CountryMutation::new(previous, category, now_ms);
        let mutation_id = mutation.mutation_id.clone();
        self.pending.insert(mutation_id.clone(), mutation);
        mutation_id
    }

    /// The remote write was accepted: the optimistic value is canonical and
    /// the pre-image can be dropped.
    pub fn commit(&mut self, mutation_id: &MutationId) -> bool {
        self.pending.remove(mutation_id).is_some()
    }

    /// The remote write failed: undo this mutation's own delta.
    ///
    /// The compensating record is built from the record *currently* in the
    /// store with only the country pair restored from the captured
    /// pre-image, then applied as a full replace-by-id. Restoring a stale
    /// whole-record snapshot here would clobber unrelated writes that landed
    /// in the interim.
    pub fn rollback(&mut self, mutation_id: &MutationId, store: &mut RecordStore) -> bool {
        let Some(mutation) = self.pending.remove(mutation_id) else {
            return false;
        };
        let Some(current) = store.get(&mutation.record_id).cloned() else {
            return false;
        };

        let mut restored = current;
        restored.country = mutation.previous_country;
        restored.country_id = mutation.previous_country_id;
        store.replace(&mutation.record_id, restored).is_ok()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn get(&self, mutation_id: &MutationId) -> Option<&CountryMutation> {
        self.pending.get(mutation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryMutation> {
        self.pending.values()
    }

    #[must_use]
    pub fn in_flight_for(&self, record_id: &RecordId) -> usize {
        self.pending
            .values()
            .filter(|m| &m.record_id == record_id)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
