//! Adapter exposing the session to an external conversational-assistant runtime.
//!
//! The runtime can read the current task and the latest outcome, and invoke a
//! single action that runs the same pipeline the form does.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::{controller::SessionController, error::SessionError, session::Outcome};

pub const EXECUTE_TASK_ACTION: &str = "executeMagenticTask";
pub const TASK_READABLE: &str = "task";
pub const RESULT_READABLE: &str = "result";
pub const EXECUTED_CONFIRMATION: &str = "Task executed successfully";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadableFact {
    pub name: String,
    pub description: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantProfile {
    pub title: String,
    pub instructions: String,
    pub greeting: String,
}

impl Default for AssistantProfile {
    fn default() -> Self {
        Self {
            title: "Magentic Assistant".to_string(),
            instructions: "You are a helpful assistant coordinating a team of AI agents. You can \
                           help users create complex tasks for research and analysis."
                .to_string(),
            greeting: "Hi! I can help you create tasks for our AI agent team. What would you \
                       like to research or analyze?"
                .to_string(),
        }
    }
}

/// Everything a runtime needs to wire the session in, in one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityManifest {
    pub profile: AssistantProfile,
    pub readables: Vec<ReadableFact>,
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecuteTaskArguments {
    task: String,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("invalid arguments for {action}: {reason}")]
    InvalidArguments { action: String, reason: String },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Capabilities the session offers an assistant runtime.
#[async_trait]
pub trait AssistantCapabilities: Send + Sync {
    fn readables(&self) -> Vec<ReadableFact>;
    fn actions(&self) -> Vec<ActionSpec>;
    async fn invoke(&self, action: &str, arguments: Value) -> Result<String, BridgeError>;
}

pub struct CapabilityBridge {
    controller: Arc<SessionController>,
    profile: AssistantProfile,
}

impl CapabilityBridge {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self::with_profile(controller, AssistantProfile::default())
    }

    pub fn with_profile(controller: Arc<SessionController>, profile: AssistantProfile) -> Self {
        Self {
            controller,
            profile,
        }
    }

    pub fn manifest(&self) -> CapabilityManifest {
        CapabilityManifest {
            profile: self.profile.clone(),
            readables: self.readables(),
            actions: self.actions(),
        }
    }

    /// Sets the task and waits for the pipeline to settle.
    pub async fn execute_task(&self, task: &str) -> Result<String, BridgeError> {
        info!(task_len = task.len(), "bridge: executing task for assistant");
        let outcome = self.controller.submit_task(task).await?;
        Ok(match outcome {
            Outcome::Failed(error) => format!("Task finished with an error: {error}"),
            _ => EXECUTED_CONFIRMATION.to_string(),
        })
    }
}

fn outcome_value(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Empty => Value::Null,
        Outcome::Succeeded(result) => Value::String(result.clone()),
        Outcome::Failed(error) => json!({ "error": error }),
    }
}

#[async_trait]
impl AssistantCapabilities for CapabilityBridge {
    fn readables(&self) -> Vec<ReadableFact> {
        let view = self.controller.view();
        vec![
            ReadableFact {
                name: TASK_READABLE.to_string(),
                description: "Current task being processed by the Magentic workflow".to_string(),
                value: Value::String(view.task),
            },
            ReadableFact {
                name: RESULT_READABLE.to_string(),
                description: "Latest result from the Magentic multi-agent workflow".to_string(),
                value: outcome_value(&view.outcome),
            },
        ]
    }

    fn actions(&self) -> Vec<ActionSpec> {
        vec![ActionSpec {
            name: EXECUTE_TASK_ACTION.to_string(),
            description: "Execute a task using the Magentic multi-agent workflow \
                          (Researcher + Coder + Manager)"
                .to_string(),
            parameters: vec![ActionParameter {
                name: "task".to_string(),
                kind: "string".to_string(),
                description: "The task to execute using multiple AI agents".to_string(),
                required: true,
            }],
        }]
    }

    async fn invoke(&self, action: &str, arguments: Value) -> Result<String, BridgeError> {
        if action != EXECUTE_TASK_ACTION {
            warn!(action, "bridge: unknown action requested");
            return Err(BridgeError::UnknownAction(action.to_string()));
        }
        let arguments: ExecuteTaskArguments =
            serde_json::from_value(arguments).map_err(|e| BridgeError::InvalidArguments {
                action: action.to_string(),
                reason: e.to_string(),
            })?;
        self.execute_task(&arguments.task).await
    }
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
