use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MALFORMED_RESPONSE_MESSAGE: &str = "The API response does not contain the expected data.";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred while requesting data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureKind {
    /// Network failure or a non-2xx status.
    Transport,
    /// A 2xx response without a usable `items` array.
    MalformedResponse,
}

/// A fetch failure as the view sees it: a kind for the user message and the
/// technical detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {detail}")]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(kind: FetchFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self.kind {
            FetchFailureKind::Transport => TRANSPORT_FAILURE_MESSAGE,
            FetchFailureKind::MalformedResponse => MALFORMED_RESPONSE_MESSAGE,
        }
    }
}
