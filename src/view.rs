//! Presentation state derived from the model. Shells render these values
//! verbatim; nothing in here feeds back into the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::edit::EditSession;
use crate::model::{Category, Gender, Record, Toast};

/// Title-cases each whitespace-separated word, collapsing runs of spaces.
#[must_use]
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short month, two-digit day, full year: `Jun 05, 2025`.
#[must_use]
pub fn format_request_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordRow {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub gender_label: String,
    pub request_date: String,
    pub country: String,
    /// Id of the category whose name matches `country`, resolved by name the
    /// way the inline select does; `None` when the display name no longer
    /// maps to a known category.
    pub country_id: Option<String>,
}

#[must_use]
pub fn record_row(record: &Record, categories: &[Category]) -> RecordRow {
    let country_id = categories
        .iter()
        .find(|c| c.name == record.country)
        .map(|c| c.id.as_str().to_string());

    RecordRow {
        id: record.id.as_str().to_string(),
        name: title_case(&record.name),
        gender: record.gender,
        gender_label: record.gender.display_name().to_string(),
        request_date: format_request_date(&record.request_date),
        country: record.country.clone(),
        country_id,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EditModalView {
    pub record_id: String,
    pub name: String,
    pub country_id: Option<String>,
    pub saving: bool,
    pub can_save: bool,
}

#[must_use]
pub fn edit_modal(session: &EditSession) -> Option<EditModalView> {
    session.draft().map(|draft| EditModalView {
        record_id: draft.base.id.as_str().to_string(),
        name: draft.name.clone(),
        country_id: draft.country_id.as_ref().map(|id| id.as_str().to_string()),
        saving: session.is_saving(),
        can_save: draft.is_valid() && !session.is_saving(),
    })
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToastView {
    pub message: String,
    pub duration_ms: u64,
}

impl From<&Toast> for ToastView {
    fn from(toast: &Toast) -> Self {
        Self {
            message: toast.message.clone(),
            duration_ms: toast.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Failed {
        message: String,
    },
    Ready {
        rows: Vec<RecordRow>,
        filter_active: bool,
        /// The active filter matched nothing; the shell should offer a
        /// "clear filters" affordance instead of a blank table.
        no_matches: bool,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
    pub countries: Vec<CategoryOption>,
    pub modal: Option<EditModalView>,
    pub error: Option<String>,
    pub toast: Option<ToastView>,
}
