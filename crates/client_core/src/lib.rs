//! Session controller for submitting a task to a remote multi-agent execution
//! service and tracking its progress and result.

pub mod activity;
pub mod backend;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
mod pipeline;
pub mod session;

pub use activity::{ActivityEvent, ActivityLog};
pub use backend::{BackendError, HttpTaskBackend, TaskBackend, GENERIC_EXECUTION_FAILURE};
pub use bridge::{AssistantCapabilities, BridgeError, CapabilityBridge, CapabilityManifest};
pub use catalog::Catalog;
pub use config::RoleConfiguration;
pub use controller::SessionController;
pub use error::{SessionError, EMPTY_TASK_NOTICE};
pub use pipeline::{COMPLETED_MESSAGE, EXECUTION_FAILED_MESSAGE, SUBMITTED_MESSAGE};
pub use session::{Outcome, Phase, SessionState, SessionView, SubmissionId};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
