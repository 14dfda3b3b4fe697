use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edit::EditSession;
use crate::mutation::MutationLedger;
use crate::store::RecordStore;
use crate::{AppError, TOAST_DURATION_MS};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

impl CategoryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one in-flight optimistic write. Every invocation gets its own,
/// so overlapping writes to the same record never share rollback state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationId(pub String);

impl MutationId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A customer/tax entry as held by the remote store.
///
/// `country` (display name) and `country_id` (foreign key) are deliberately
/// denormalized for legacy display paths; every write path re-derives
/// `country` from the authoritative category whenever `country_id` changes,
/// never the reverse. `country_id` may be absent on legacy rows, in which
/// case the edit path resolves it by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<CategoryId>,
    #[serde(rename = "createdAt")]
    pub request_date: DateTime<Utc>,
}

impl Record {
    /// The record as it will look once `category` is applied to it. All
    /// fields other than the country pair are untouched.
    #[must_use]
    pub fn with_category(&self, category: &Category) -> Self {
        let mut next = self.clone();
        next.country = category.name.clone();
        next.country_id = Some(category.id.clone());
        next
    }
}

/// A country reference entity. Immutable once loaded; `id` uniqueness is
/// guaranteed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl Toast {
    #[must_use]
    pub fn new(message: impl Into<String>, now_ms: u64) -> Self {
        Self {
            message: message.into(),
            created_at_ms: now_ms,
            duration_ms: TOAST_DURATION_MS,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

/// Tracks the joint load of records and categories. The store is only
/// initialized once both halves have arrived; a single failure fails the
/// whole cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading {
        records: Option<Vec<Record>>,
        categories: Option<Vec<Category>>,
    },
    Ready,
    Failed,
}

impl LoadPhase {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading { .. })
    }
}

#[derive(Default)]
pub struct Model {
    pub phase: LoadPhase,
    pub store: RecordStore,
    /// Active country filter, in toggle order. Empty means show all.
    pub filter: Vec<CategoryId>,
    pub edit: EditSession,
    pub mutations: MutationLedger,
    pub active_error: Option<AppError>,
    pub active_toast: Option<Toast>,
    pub now_ms: u64,
}

impl Model {
    pub fn touch(&mut self) {
        self.now_ms = crate::current_time_ms();
    }

    /// A new error supersedes any live toast.
    pub fn set_error(&mut self, error: AppError) {
        self.active_toast = None;
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.active_toast = Some(Toast::new(message, self.now_ms));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    /// Resets all per-load-cycle state and enters `Loading`.
    pub fn begin_load(&mut self) {
        self.phase = LoadPhase::Loading {
            records: None,
            categories: None,
        };
        self.store.reset();
        self.filter.clear();
        self.edit = EditSession::Closed;
        self.mutations.clear();
        self.active_error = None;
        self.active_toast = None;
    }

    pub fn toggle_filter(&mut self, category_id: CategoryId) {
        if let Some(pos) = self.filter.iter().position(|id| *id == category_id) {
            self.filter.remove(pos);
        } else {
            self.filter.push(category_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }

    fn record(id: &str, country: &str, country_id: Option<&str>) -> Record {
        Record {
            id: RecordId::new(id),
            name: "ada lovelace".into(),
            gender: Gender::Female,
            country: country.into(),
            country_id: country_id.map(CategoryId::new),
            request_date: chrono::DateTime::parse_from_rfc3339("2025-06-05T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_with_category_touches_only_country_pair() {
        let base = record("1", "France", Some("c1"));
        let next = base.with_category(&category("c2", "Spain"));

        assert_eq!(next.country, "Spain");
        assert_eq!(next.country_id, Some(CategoryId::new("c2")));
        assert_eq!(next.id, base.id);
        assert_eq!(next.name, base.name);
        assert_eq!(next.gender, base.gender);
        assert_eq!(next.request_date, base.request_date);
    }

    #[test]
    fn test_record_wire_format() {
        let json = serde_json::json!({
            "id": "7",
            "name": "grace hopper",
            "gender": "female",
            "country": "France",
            "countryId": "c1",
            "createdAt": "2025-06-05T10:30:00.000Z",
        });
        let parsed: Record = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.country_id, Some(CategoryId::new("c1")));

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["countryId"], "c1");
        assert!(back["createdAt"].as_str().unwrap().starts_with("2025-06-05"));
        assert!(back.get("country_id").is_none());
    }

    #[test]
    fn test_record_wire_format_without_country_id() {
        let json = serde_json::json!({
            "id": "7",
            "name": "grace hopper",
            "gender": "Female",
            "country": "France",
            "createdAt": "2025-06-05T10:30:00.000Z",
        });
        let parsed: Record = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.country_id, None);
        assert_eq!(parsed.gender, Gender::Female);

        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back.get("countryId").is_none());
    }

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::new("Customer updated successfully.", 1_000);
        assert!(!toast.is_expired(1_000));
        assert!(!toast.is_expired(3_000));
        assert!(toast.is_expired(3_001));
        // Clock going backwards must not expire the toast.
        assert!(!toast.is_expired(0));
    }

    #[test]
    fn test_error_supersedes_toast() {
        let mut model = Model::default();
        model.show_toast("Customer updated successfully.");
        assert!(model.active_toast.is_some());

        model.set_error(AppError::new(ErrorKind::UpdateFailed, "http 500"));
        assert!(model.active_toast.is_none());
        assert!(model.active_error.is_some());
    }

    #[test]
    fn test_toggle_filter_round_trip() {
        let mut model = Model::default();
        model.toggle_filter(CategoryId::new("c1"));
        model.toggle_filter(CategoryId::new("c2"));
        assert_eq!(model.filter.len(), 2);

        model.toggle_filter(CategoryId::new("c1"));
        assert_eq!(model.filter, vec![CategoryId::new("c2")]);
    }

    #[test]
    fn test_begin_load_resets_session_state() {
        let mut model = Model::default();
        model.filter.push(CategoryId::new("c1"));
        model.show_toast("Customer updated successfully.");
        model.set_error(AppError::new(ErrorKind::SaveFailed, "boom"));

        model.begin_load();

        assert!(matches!(
            model.phase,
            LoadPhase::Loading {
                records: None,
                categories: None
            }
        ));
        assert!(model.filter.is_empty());
        assert!(model.active_error.is_none());
        assert!(model.active_toast.is_none());
        assert!(model.mutations.is_empty());
    }
}
