//! Remote execution backend: the trait the session drives and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::ErrorDetail,
    protocol::{
        ExampleTask, ExamplesResponse, ExecuteTaskRequest, ExecuteTaskResponse, HealthStatus,
        ModelInfo, ModelsResponse,
    },
};
use thiserror::Error;
use tracing::{debug, warn};

/// Shown when a failure carries no usable description at all.
pub const GENERIC_EXECUTION_FAILURE: &str = "Failed to execute task";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Best available text for the operator: backend detail, then transport
    /// text, then the generic fallback.
    pub fn description(&self) -> String {
        match self {
            BackendError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            BackendError::Rejected {
                status,
                detail: None,
            } => format!("Request failed with status code {status}"),
            BackendError::Transport(message) | BackendError::Malformed(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => GENERIC_EXECUTION_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Rejected {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list_examples(&self) -> Result<Vec<ExampleTask>, BackendError>;
    async fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError>;
    async fn execute(
        &self,
        request: &ExecuteTaskRequest,
    ) -> Result<ExecuteTaskResponse, BackendError>;
    async fn health(&self) -> Result<HealthStatus, BackendError>;
}

pub struct HttpTaskBackend {
    http: Client,
    server_url: String,
}

impl HttpTaskBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(server_url, Client::new())
    }

    pub fn with_client(server_url: impl Into<String>, http: Client) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    /// Transport-level timeout. Nothing above the transport enforces one.
    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(server_url, http))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.server_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = ErrorDetail::from_body(&body).map(|parsed| parsed.detail);
        warn!(
            status = status.as_u16(),
            has_detail = detail.is_some(),
            "backend: request rejected"
        );
        return Err(BackendError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| BackendError::Malformed(e.to_string()))
}

#[async_trait]
impl TaskBackend for HttpTaskBackend {
    async fn list_examples(&self) -> Result<Vec<ExampleTask>, BackendError> {
        let body: ExamplesResponse = self.get_json("examples").await?;
        Ok(body.examples)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError> {
        let body: ModelsResponse = self.get_json("models").await?;
        Ok(body.models)
    }

    async fn execute(
        &self,
        request: &ExecuteTaskRequest,
    ) -> Result<ExecuteTaskResponse, BackendError> {
        debug!(
            max_rounds = request.max_rounds,
            researcher = %request.researcher_model,
            coder = %request.coder_model,
            manager = %request.manager_model,
            reviewer = %request.reviewer_model,
            "backend: posting execute request"
        );
        let response = self
            .http
            .post(self.endpoint("execute"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.get_json("health").await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
