use serde::{Deserialize, Serialize};

use crate::domain::{ActivityKind, AgentRole};

/// Round budget sent with every execution request.
pub const MAX_ROUNDS: u32 = 20;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleTask {
    pub title: String,
    pub description: String,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplesResponse {
    #[serde(default)]
    pub examples: Vec<ExampleTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub agents_initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    pub task: String,
    pub max_rounds: u32,
    pub researcher_model: String,
    pub coder_model: String,
    pub manager_model: String,
    pub reviewer_model: String,
}

impl ExecuteTaskRequest {
    pub fn model_for(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::Researcher => &self.researcher_model,
            AgentRole::Coder => &self.coder_model,
            AgentRole::Manager => &self.manager_model,
            AgentRole::Reviewer => &self.reviewer_model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteTaskResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub activity_log: Vec<ActivityLogEntry>,
}

impl ExecuteTaskResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
