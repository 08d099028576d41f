use thiserror::Error;

/// Inline notice shown when a submission carries no task text.
pub const EMPTY_TASK_NOTICE: &str = "Please enter a task";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a task is already running")]
    Busy,
    #[error("{}", EMPTY_TASK_NOTICE)]
    EmptyTask,
    #[error("submission was superseded before its response arrived")]
    Superseded,
    #[error("no example at index {0}")]
    UnknownExample(usize),
}
