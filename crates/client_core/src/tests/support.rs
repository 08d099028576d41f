use std::collections::VecDeque;

use async_trait::async_trait;
use shared::protocol::{
    ActivityLogEntry, ExampleTask, ExecuteTaskRequest, ExecuteTaskResponse, HealthStatus,
    ModelInfo,
};
use tokio::sync::{Mutex, Notify};

use crate::backend::{BackendError, TaskBackend};

/// In-memory backend that replays scripted answers and records every request.
pub(crate) struct ScriptedBackend {
    examples: Result<Vec<ExampleTask>, BackendError>,
    models: Result<Vec<ModelInfo>, BackendError>,
    responses: Mutex<VecDeque<Result<ExecuteTaskResponse, BackendError>>>,
    pub requests: Mutex<Vec<ExecuteTaskRequest>>,
    pub catalog_fetches: Mutex<u32>,
    hold: bool,
    pub started: Notify,
    pub release: Notify,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            examples: Ok(Vec::new()),
            models: Ok(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            catalog_fetches: Mutex::new(0),
            hold: false,
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn answering(response: Result<ExecuteTaskResponse, BackendError>) -> Self {
        Self::new().then(response)
    }

    pub fn then(self, response: Result<ExecuteTaskResponse, BackendError>) -> Self {
        self.responses
            .try_lock()
            .expect("fresh backend is unlocked")
            .push_back(response);
        self
    }

    /// Execute calls wait for `release` after signalling `started`.
    pub fn holding(mut self) -> Self {
        self.hold = true;
        self
    }

    pub fn with_examples(mut self, examples: Result<Vec<ExampleTask>, BackendError>) -> Self {
        self.examples = examples;
        self
    }

    pub fn with_models(mut self, models: Result<Vec<ModelInfo>, BackendError>) -> Self {
        self.models = models;
        self
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl TaskBackend for ScriptedBackend {
    async fn list_examples(&self) -> Result<Vec<ExampleTask>, BackendError> {
        *self.catalog_fetches.lock().await += 1;
        self.examples.clone()
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError> {
        *self.catalog_fetches.lock().await += 1;
        self.models.clone()
    }

    async fn execute(
        &self,
        request: &ExecuteTaskRequest,
    ) -> Result<ExecuteTaskResponse, BackendError> {
        self.requests.lock().await.push(request.clone());
        if self.hold {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted response".to_string())))
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            agents_initialized: true,
        })
    }
}

pub(crate) fn success(result: &str, activity_log: Vec<ActivityLogEntry>) -> ExecuteTaskResponse {
    ExecuteTaskResponse {
        status: "success".to_string(),
        result: Some(result.to_string()),
        error: None,
        activity_log,
    }
}

pub(crate) fn backend_error(error: &str) -> ExecuteTaskResponse {
    ExecuteTaskResponse {
        status: "error".to_string(),
        result: None,
        error: Some(error.to_string()),
        activity_log: Vec::new(),
    }
}

pub(crate) fn example(title: &str, task: &str) -> ExampleTask {
    ExampleTask {
        title: title.to_string(),
        description: format!("{title} example"),
        task: task.to_string(),
    }
}

pub(crate) fn model(id: &str, name: &str) -> ModelInfo {
    ModelInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
    }
}
