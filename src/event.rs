use serde::{Deserialize, Serialize};

use crate::model::{Category, CategoryId, MutationId, Record, RecordId};

type HttpResult<T> = crux_http::Result<crux_http::Response<T>>;

#[derive(Serialize, Deserialize)]
pub enum Event {
    /// Kick off the initial load cycle: both remote reads in parallel.
    AppStarted,
    /// Restart the load cycle from scratch (the "Please try again" path).
    ReloadRequested,
    RecordsFetched(HttpResult<Vec<Record>>),
    CategoriesFetched(HttpResult<Vec<Category>>),

    FilterToggled {
        category_id: CategoryId,
    },
    FilterCleared,

    /// Inline country change from the table; applied optimistically.
    InlineCountryChanged {
        record_id: RecordId,
        category_id: CategoryId,
    },
    InlineUpdateResponse {
        record_id: RecordId,
        mutation_id: MutationId,
        result: Box<HttpResult<Record>>,
    },

    EditRequested {
        record_id: RecordId,
    },
    EditNameChanged {
        name: String,
    },
    EditCountryChanged {
        category_id: CategoryId,
    },
    EditSubmitted,
    EditCancelled,
    EditSaveResponse {
        result: Box<HttpResult<Record>>,
    },

    DismissError,
    DismissToast,
    /// Shell clock tick; drives the toast auto-clear poll.
    TimerTick,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::ReloadRequested => "reload_requested",
            Self::RecordsFetched(_) => "records_fetched",
            Self::CategoriesFetched(_) => "categories_fetched",
            Self::FilterToggled { .. } => "filter_toggled",
            Self::FilterCleared => "filter_cleared",
            Self::InlineCountryChanged { .. } => "inline_country_changed",
            Self::InlineUpdateResponse { .. } => "inline_update_response",
            Self::EditRequested { .. } => "edit_requested",
            Self::EditNameChanged { .. } => "edit_name_changed",
            Self::EditCountryChanged { .. } => "edit_country_changed",
            Self::EditSubmitted => "edit_submitted",
            Self::EditCancelled => "edit_cancelled",
            Self::EditSaveResponse { .. } => "edit_save_response",
            Self::DismissError => "dismiss_error",
            Self::DismissToast => "dismiss_toast",
            Self::TimerTick => "timer_tick",
        }
    }

    /// User-initiated events, as opposed to network completions and clock
    /// ticks.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::ReloadRequested
                | Self::FilterToggled { .. }
                | Self::FilterCleared
                | Self::InlineCountryChanged { .. }
                | Self::EditRequested { .. }
                | Self::EditNameChanged { .. }
                | Self::EditCountryChanged { .. }
                | Self::EditSubmitted
                | Self::EditCancelled
                | Self::DismissError
                | Self::DismissToast
        )
    }
}
