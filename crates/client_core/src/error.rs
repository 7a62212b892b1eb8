use reqwest::StatusCode;
use shared::error::{FetchFailure, FetchFailureKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timetable request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("timetable endpoint answered with status {0}")]
    Status(StatusCode),
    #[error("timetable response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("timetable response has no `items` array")]
    MissingItems,
}

impl FetchError {
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            FetchError::Transport(_) | FetchError::Status(_) => FetchFailureKind::Transport,
            FetchError::Decode(_) | FetchError::MissingItems => FetchFailureKind::MalformedResponse,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(err) if err.is_timeout())
    }
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        FetchFailure::new(err.kind(), err.to_string())
    }
}

impl From<FetchError> for FetchFailure {
    fn from(err: FetchError) -> Self {
        FetchFailure::from(&err)
    }
}
