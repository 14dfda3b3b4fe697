//! The staged, explicit-commit editing workflow for a full record.
//!
//! At most one session exists at a time; it owns a draft copy of the record
//! until committed or discarded. State machine:
//! `Closed -> Open -> { Saving -> Closed | Open (failure, draft retained) }
//! | Closed (cancel)`.

use serde::{Deserialize, Serialize};

use crate::model::{Category, CategoryId, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditDraft {
    /// Snapshot of the record as it was when the modal opened; commit patches
    /// are built on top of it.
    pub base: Record,
    pub name: String,
    pub country_id: Option<CategoryId>,
}

impl EditDraft {
    /// The full-record patch sent to the remote store on commit: the base
    /// record with the draft name, and the country pair re-derived from the
    /// selected category when it resolves (both fields or neither).
    #[must_use]
    pub fn build_patch(&self, categories: &[Category]) -> Record {
        let resolved = self
            .country_id
            .as_ref()
            .and_then(|id| categories.iter().find(|c| &c.id == id));

        let mut patch = self.base.clone();
        patch.name = self.name.clone();
        if let Some(category) = resolved {
            patch.country = category.name.clone();
            patch.country_id = Some(category.id.clone());
        }
        patch
    }

    /// Commit is only available while the name is non-empty; enforced at this
    /// boundary rather than by a server round trip.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum EditSession {
    #[default]
    Closed,
    Open(EditDraft),
    Saving(EditDraft),
}

impl EditSession {
    /// Opens a session for `record`. Only valid from `Closed`; a session that
    /// is already open or saving is left untouched and `false` is returned.
    ///
    /// The draft country prefers the record's own `country_id`; legacy rows
    /// without one fall back to a by-name category lookup.
    pub fn open(&mut self, record: &Record, categories: &[Category]) -> bool {
        if !matches!(self, Self::Closed) {
            return false;
        }

        let country_id = record.country_id.clone().or_else(|| {
            categories
                .iter()
                .find(|c| c.name == record.country)
                .map(|c| c.id.clone())
        });

        *self = Self::Open(EditDraft {
            base: record.clone(),
            name: record.name.clone(),
            country_id,
        });
        true
    }

    /// Mutates the draft name; valid only in `Open`.
    pub fn edit_name(&mut self, name: impl Into<String>) -> bool {
        match self {
            Self::Open(draft) => {
                draft.name = name.into();
                true
            }
            _ => false,
        }
    }

    /// Mutates the draft country selection; valid only in `Open`.
    pub fn edit_country(&mut self, category_id: CategoryId) -> bool {
        match self {
            Self::Open(draft) => {
                draft.country_id = Some(category_id);
                true
            }
            _ => false,
        }
    }

    /// Transitions `Open -> Saving` and returns the patch to send, or `None`
    /// when no commit is permitted (closed, already saving, or invalid
    /// draft). Re-entrant commits are thereby rejected.
    pub fn begin_save(&mut self, categories: &[Category]) -> Option<Record> {
        match std::mem::take(self) {
            Self::Open(draft) if draft.is_valid() => {
                let patch = draft.build_patch(categories);
                *self = Self::Saving(draft);
                Some(patch)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// The save was confirmed; the session closes and the draft is dropped.
    pub fn complete_save(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Saving(_) => true,
            other => {
                *self = other;
                false
            }
        }
    }

    /// The save failed; reopen with the draft intact so the operator does
    /// not lose typed input on a transient failure.
    pub fn fail_save(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Saving(draft) => {
                *self = Self::Open(draft);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Discards the draft without a remote call. Valid only from `Open`;
    /// cancellation is unavailable while a save is in flight.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Open(_) => true,
            other => {
                *self = other;
                false
            }
        }
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&EditDraft> {
        match self {
            Self::Closed => None,
            Self::Open(draft) | Self::Saving(draft) => Some(draft),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self, Self::Saving(_))
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
