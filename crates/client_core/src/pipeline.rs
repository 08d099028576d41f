//! Interpretation of a finished execute call into an outcome and a log update.

use shared::{
    domain::ActivityKind,
    protocol::{ActivityLogEntry, ExecuteTaskResponse},
};

use crate::{
    backend::{BackendError, GENERIC_EXECUTION_FAILURE},
    session::Outcome,
};

pub const SUBMITTED_MESSAGE: &str = "🚀 Task submitted - Agents initializing...";
pub const SUBMITTED_ICON: &str = "🚀";
pub const COMPLETED_MESSAGE: &str = "✅ Task completed successfully";
pub const COMPLETED_ICON: &str = "✅";
pub const EXECUTION_FAILED_MESSAGE: &str = "Task execution failed";
pub const ERROR_ICON: &str = "❌";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogUpdate {
    /// Drop everything logged so far and show these entries instead.
    Replace(Vec<ActivityLogEntry>),
    Append(ActivityLogEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settlement {
    pub outcome: Outcome,
    pub log: LogUpdate,
}

impl Settlement {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            log: LogUpdate::Append(error_entry(&message)),
            outcome: Outcome::Failed(message),
        }
    }

    fn success(result: String, activity_log: Vec<ActivityLogEntry>) -> Self {
        let entries = if activity_log.is_empty() {
            vec![ActivityLogEntry {
                kind: ActivityKind::System,
                message: COMPLETED_MESSAGE.to_string(),
                icon: COMPLETED_ICON.to_string(),
            }]
        } else {
            activity_log
        };
        Self {
            outcome: Outcome::Succeeded(result),
            log: LogUpdate::Replace(entries),
        }
    }
}

pub(crate) fn settle(response: Result<ExecuteTaskResponse, BackendError>) -> Settlement {
    match response {
        Ok(response) if response.is_success() => match response.result {
            Some(result) => Settlement::success(result, response.activity_log),
            None => Settlement::failure(
                BackendError::Malformed("success response carried no result".to_string())
                    .description(),
            ),
        },
        Ok(response) => Settlement::failure(
            response
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| EXECUTION_FAILED_MESSAGE.to_string()),
        ),
        Err(err) => Settlement::failure(err.description()),
    }
}

/// The awaiting side went away before a response arrived.
pub(crate) fn settle_abandoned() -> Settlement {
    Settlement::failure(GENERIC_EXECUTION_FAILURE)
}

fn error_entry(message: &str) -> ActivityLogEntry {
    ActivityLogEntry {
        kind: ActivityKind::Error,
        message: message.to_string(),
        icon: ERROR_ICON.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str) -> ExecuteTaskResponse {
        ExecuteTaskResponse {
            status: status.to_string(),
            result: None,
            error: None,
            activity_log: Vec::new(),
        }
    }

    #[test]
    fn success_without_log_gets_single_fallback_entry() {
        let mut ok = response("success");
        ok.result = Some("done".to_string());
        let settlement = settle(Ok(ok));
        assert_eq!(settlement.outcome, Outcome::Succeeded("done".to_string()));
        let LogUpdate::Replace(entries) = settlement.log else {
            panic!("success must replace the log");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, COMPLETED_MESSAGE);
    }

    #[test]
    fn backend_error_without_message_uses_generic_text() {
        let settlement = settle(Ok(response("error")));
        assert_eq!(
            settlement.outcome,
            Outcome::Failed(EXECUTION_FAILED_MESSAGE.to_string())
        );
    }

    #[test]
    fn success_missing_result_is_a_failure() {
        let settlement = settle(Ok(response("success")));
        assert!(matches!(settlement.outcome, Outcome::Failed(_)));
        assert!(matches!(settlement.log, LogUpdate::Append(ref e) if e.kind == ActivityKind::Error));
    }

    #[test]
    fn transport_failure_prefers_backend_detail() {
        let settlement = settle(Err(BackendError::Rejected {
            status: 500,
            detail: Some("Workflow not initialized".to_string()),
        }));
        assert_eq!(
            settlement.outcome,
            Outcome::Failed("Workflow not initialized".to_string())
        );
    }

    #[test]
    fn blank_transport_text_falls_back_to_generic() {
        let settlement = settle(Err(BackendError::Transport(String::new())));
        assert_eq!(
            settlement.outcome,
            Outcome::Failed(GENERIC_EXECUTION_FAILURE.to_string())
        );
    }
}
