//! View state of the status viewer.

use serde::Serialize;

use super::source::FetchError;
use crate::config::VIEWER_ERROR_MESSAGE;
use crate::health::HealthSnapshot;

/// Progress of the health fetch. Exactly one variant holds at a time.
///
/// Serializes as `{"state": "loading"}`, `{"state": "error", "data": "..."}`
/// or `{"state": "loaded", "data": {...snapshot}}` for templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ViewState {
    Loading,
    Error(String),
    Loaded(HealthSnapshot),
}

impl ViewState {
    /// Error state with the user-facing message.
    pub fn failed() -> Self {
        ViewState::Error(VIEWER_ERROR_MESSAGE.to_string())
    }

    /// Settles a fetch result. The cause of a failure is logged, never shown.
    pub fn from_fetch(result: Result<HealthSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => ViewState::Loaded(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Failed to load health snapshot");
                Self::failed()
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error(_))
    }

    pub fn snapshot(&self) -> Option<&HealthSnapshot> {
        match self {
            ViewState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
