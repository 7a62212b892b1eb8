//! UI/backend events and error modeling for desktop GUI controller.

use shared::{domain::FlightRecord, error::FetchFailure};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    FlightsLoaded {
        generation: u64,
        records: Vec<FlightRecord>,
    },
    FetchFailed {
        generation: u64,
        failure: FetchFailure,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Fetch,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("not valid json")
            || message_lower.contains("no `items`")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("status")
            || message_lower.contains("request failed")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => "Startup error",
            (_, UiErrorCategory::Transport) => "Network error",
            (_, UiErrorCategory::Validation) => "Data error",
            (_, UiErrorCategory::Unknown) => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fetch_failure_details() {
        let status = UiError::from_message(
            UiErrorContext::Fetch,
            "timetable endpoint answered with status 502 Bad Gateway",
        );
        let missing = UiError::from_message(
            UiErrorContext::Fetch,
            "timetable response has no `items` array",
        );
        let other = UiError::from_message(UiErrorContext::Fetch, "something odd");

        assert_eq!(status.category(), UiErrorCategory::Transport);
        assert_eq!(status.label(), "Network error");
        assert_eq!(missing.category(), UiErrorCategory::Validation);
        assert_eq!(other.category(), UiErrorCategory::Unknown);
    }

    #[test]
    fn startup_context_overrides_category_label() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build http client: connection pool",
        );

        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert_eq!(err.label(), "Startup error");
        assert!(err.message().starts_with("backend worker startup failure"));
    }
}
