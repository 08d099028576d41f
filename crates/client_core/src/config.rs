use shared::{
    domain::{AgentRole, DEFAULT_MODEL_ID},
    protocol::{ExecuteTaskRequest, ModelInfo, MAX_ROUNDS},
};

/// One model identifier per agent role.
///
/// Identifiers are not checked against the model catalog when set; the
/// operator may pick ahead of the catalog loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfiguration {
    researcher: String,
    coder: String,
    manager: String,
    reviewer: String,
}

impl Default for RoleConfiguration {
    fn default() -> Self {
        Self::uniform(DEFAULT_MODEL_ID)
    }
}

impl RoleConfiguration {
    pub fn uniform(model_id: &str) -> Self {
        let model_id = baseline_or(model_id);
        Self {
            researcher: model_id.clone(),
            coder: model_id.clone(),
            manager: model_id.clone(),
            reviewer: model_id,
        }
    }

    pub fn model(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::Researcher => &self.researcher,
            AgentRole::Coder => &self.coder,
            AgentRole::Manager => &self.manager,
            AgentRole::Reviewer => &self.reviewer,
        }
    }

    /// A blank identifier falls back to the baseline model.
    pub fn set(&mut self, role: AgentRole, model_id: &str) {
        let slot = match role {
            AgentRole::Researcher => &mut self.researcher,
            AgentRole::Coder => &mut self.coder,
            AgentRole::Manager => &mut self.manager,
            AgentRole::Reviewer => &mut self.reviewer,
        };
        *slot = baseline_or(model_id);
    }

    /// Roles whose selection is missing from a loaded, non-empty catalog.
    pub fn unlisted_roles(&self, models: &[ModelInfo]) -> Vec<AgentRole> {
        if models.is_empty() {
            return Vec::new();
        }
        AgentRole::ALL
            .into_iter()
            .filter(|role| !models.iter().any(|m| m.id == self.model(*role)))
            .collect()
    }

    pub fn to_request(&self, task: impl Into<String>) -> ExecuteTaskRequest {
        ExecuteTaskRequest {
            task: task.into(),
            max_rounds: MAX_ROUNDS,
            researcher_model: self.researcher.clone(),
            coder_model: self.coder.clone(),
            manager_model: self.manager.clone(),
            reviewer_model: self.reviewer.clone(),
        }
    }
}

fn baseline_or(model_id: &str) -> String {
    let trimmed = model_id.trim();
    if trimmed.is_empty() {
        DEFAULT_MODEL_ID.to_string()
    } else {
        trimmed.to_string()
    }
}
