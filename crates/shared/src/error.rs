use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{detail}")]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Parses an error body, ignoring anything that is not a non-empty `detail`.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|parsed| !parsed.detail.trim().is_empty())
    }
}
