use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError, RwLock,
};

use shared::{
    domain::AgentRole,
    protocol::{ExecuteTaskRequest, ExecuteTaskResponse},
};
use tracing::{info, warn};

use crate::{
    backend::{BackendError, TaskBackend},
    catalog::{load_catalog, Catalog},
    config::RoleConfiguration,
    error::SessionError,
    session::{Outcome, SessionState, SessionView, SubmissionId},
};

/// Owns the session record and drives the execution pipeline against a backend.
///
/// The state lock is only held for the duration of a transition, never across
/// the backend call; exclusion between submissions comes from the session
/// phase.
pub struct SessionController {
    backend: Arc<dyn TaskBackend>,
    state: Mutex<SessionState>,
    catalog: RwLock<Catalog>,
    catalog_requested: AtomicBool,
}

impl SessionController {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self::with_roles(backend, RoleConfiguration::default())
    }

    pub fn with_roles(backend: Arc<dyn TaskBackend>, roles: RoleConfiguration) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState::new(roles)),
            catalog: RwLock::new(Catalog::default()),
            catalog_requested: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn backend(&self) -> &Arc<dyn TaskBackend> {
        &self.backend
    }

    /// Loads examples and models. Only the first call fetches.
    pub async fn load_catalog(&self) {
        if self.catalog_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        load_catalog(self.backend.as_ref(), &self.catalog).await;
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn view(&self) -> SessionView {
        let catalog = self.catalog();
        self.state().view(catalog)
    }

    pub fn task(&self) -> String {
        self.state().task().to_string()
    }

    pub fn outcome(&self) -> Outcome {
        self.state().outcome().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    pub fn set_task(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.state().set_task(text)
    }

    pub fn set_role_model(&self, role: AgentRole, model_id: &str) -> Result<(), SessionError> {
        self.state().set_role_model(role, model_id)?;
        info!(role = %role, model = model_id, "session: role model selected");
        Ok(())
    }

    pub fn load_example(&self, index: usize) -> Result<(), SessionError> {
        let example = self
            .catalog()
            .example(index)
            .cloned()
            .ok_or(SessionError::UnknownExample(index))?;
        self.state().load_example(&example)?;
        info!(title = %example.title, "session: example loaded");
        Ok(())
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.state().reset()
    }

    pub fn toggle_activity_log(&self) -> bool {
        self.state().toggle_activity_visible()
    }

    /// Runs the pipeline with the current task.
    pub async fn submit(&self) -> Result<Outcome, SessionError> {
        self.run(None).await
    }

    /// Sets the task and runs the pipeline in one step.
    pub async fn submit_task(&self, task: impl Into<String>) -> Result<Outcome, SessionError> {
        self.run(Some(task.into())).await
    }

    async fn run(&self, task: Option<String>) -> Result<Outcome, SessionError> {
        let ticket = self.state().begin_submission(task);
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(err) => {
                warn!(error = %err, "session: submission rejected");
                return Err(err);
            }
        };

        self.report_unlisted_models(&ticket.request);
        info!(
            submission = ticket.id.0,
            task_len = ticket.request.task.len(),
            "session: task submitted"
        );

        let in_flight = InFlight::new(self, ticket.id);
        let response = self.backend.execute(&ticket.request).await;
        let outcome = in_flight
            .settle(response)
            .ok_or(SessionError::Superseded)?;

        match &outcome {
            Outcome::Failed(error) => {
                warn!(submission = ticket.id.0, error = %error, "session: task failed")
            }
            _ => info!(submission = ticket.id.0, "session: task completed"),
        }
        Ok(outcome)
    }

    fn report_unlisted_models(&self, request: &ExecuteTaskRequest) {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        let roles = self.state().roles().clone();
        for role in roles.unlisted_roles(&catalog.models) {
            warn!(
                role = %role,
                model = request.model_for(role),
                "session: selected model is not in the model catalog"
            );
        }
    }
}

/// Settles the submission as a failure if the awaiting future is dropped
/// before the backend answers, so the phase cannot stay `Running`.
struct InFlight<'a> {
    controller: &'a SessionController,
    id: SubmissionId,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(controller: &'a SessionController, id: SubmissionId) -> Self {
        Self {
            controller,
            id,
            settled: false,
        }
    }

    fn settle(
        mut self,
        response: Result<ExecuteTaskResponse, BackendError>,
    ) -> Option<Outcome> {
        self.settled = true;
        let outcome = self
            .controller
            .state()
            .complete_submission(self.id, response);
        outcome
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(submission = self.id.0, "session: submission abandoned before response");
        self.controller.state().abandon_submission(self.id);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
