#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod api;
pub mod app;
pub mod edit;
pub mod event;
pub mod filter;
pub mod model;
pub mod mutation;
pub mod store;
pub mod view;

use serde::{Deserialize, Serialize};

pub use app::{App, Capabilities, Effect};
pub use edit::{EditDraft, EditSession};
pub use event::Event;
pub use model::{
    Category, CategoryId, Gender, LoadPhase, Model, MutationId, Record, RecordId, Toast,
};
pub use mutation::{CountryMutation, MutationLedger};
pub use store::{RecordStore, StoreError};
pub use view::{CategoryOption, EditModalView, RecordRow, ToastView, ViewModel, ViewState};

/// How long a success toast stays visible before it auto-clears.
pub const TOAST_DURATION_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The initial fetch of records or categories failed. Fatal to the load
    /// cycle; no partial UI is shown.
    Load,
    /// An inline optimistic write failed and was rolled back.
    UpdateFailed,
    /// A modal commit failed; the draft is retained.
    SaveFailed,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Load => "LOAD_ERROR",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::SaveFailed => "SAVE_FAILED",
        }
    }

    /// Blocking errors replace the whole view; the rest surface as banners.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Load)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn user_facing_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::Load => "Failed to load data. Please try again.",
            ErrorKind::UpdateFailed => "Failed to update country, reverted.",
            ErrorKind::SaveFailed => "Failed to save. Please try again.",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

#[must_use]
pub fn current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
