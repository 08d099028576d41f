//! Session record and its transition functions.
//!
//! Every field the front end renders lives in one [`SessionState`]. Fields are
//! only changed through the methods below, each of which checks the phase
//! first, so a running submission freezes the task and role selection and a
//! second submission cannot start.

use shared::{
    domain::{ActivityKind, AgentRole},
    protocol::{ExampleTask, ExecuteTaskRequest, ExecuteTaskResponse},
};

use crate::{
    activity::ActivityLog,
    backend::BackendError,
    catalog::Catalog,
    config::RoleConfiguration,
    error::{SessionError, EMPTY_TASK_NOTICE},
    pipeline::{self, LogUpdate, Settlement, SUBMITTED_ICON, SUBMITTED_MESSAGE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running(SubmissionId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Empty,
    Succeeded(String),
    Failed(String),
}

impl Outcome {
    pub fn result(&self) -> Option<&str> {
        match self {
            Outcome::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What a successful validation hands to the awaiting side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub id: SubmissionId,
    pub request: ExecuteTaskRequest,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    task: String,
    roles: RoleConfiguration,
    phase: Phase,
    outcome: Outcome,
    notice: Option<String>,
    activity: ActivityLog,
    activity_visible: bool,
    last_submission: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(RoleConfiguration::default())
    }
}

impl SessionState {
    pub fn new(roles: RoleConfiguration) -> Self {
        Self {
            task: String::new(),
            roles,
            phase: Phase::Idle,
            outcome: Outcome::Empty,
            notice: None,
            activity: ActivityLog::default(),
            activity_visible: true,
            last_submission: 0,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn roles(&self) -> &RoleConfiguration {
        &self.roles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn activity_visible(&self) -> bool {
        self.activity_visible
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_running() {
            Err(SessionError::Busy)
        } else {
            Ok(())
        }
    }

    pub fn set_task(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.task = text.into();
        self.notice = None;
        Ok(())
    }

    pub fn set_role_model(&mut self, role: AgentRole, model_id: &str) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.roles.set(role, model_id);
        Ok(())
    }

    /// Starts a fresh task from a catalog example.
    pub fn load_example(&mut self, example: &ExampleTask) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.task = example.task.clone();
        self.clear_display();
        Ok(())
    }

    /// Starts a fresh, empty task.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.task.clear();
        self.clear_display();
        Ok(())
    }

    fn clear_display(&mut self) {
        self.outcome = Outcome::Empty;
        self.notice = None;
        self.activity.clear();
    }

    /// Display-only flag; has no effect on the pipeline.
    pub fn toggle_activity_visible(&mut self) -> bool {
        self.activity_visible = !self.activity_visible;
        self.activity_visible
    }

    /// Validates and enters `Running`.
    ///
    /// `task` replaces the current task text first when given. A busy session
    /// is left untouched; a blank task leaves the phase `Idle` and only sets
    /// the inline notice.
    pub fn begin_submission(
        &mut self,
        task: Option<String>,
    ) -> Result<SubmissionTicket, SessionError> {
        self.ensure_idle()?;
        if let Some(task) = task {
            self.task = task;
        }
        if self.task.trim().is_empty() {
            self.notice = Some(EMPTY_TASK_NOTICE.to_string());
            return Err(SessionError::EmptyTask);
        }

        self.last_submission += 1;
        let id = SubmissionId(self.last_submission);
        self.phase = Phase::Running(id);
        self.clear_display();
        self.activity_visible = true;
        self.activity
            .append(ActivityKind::System, SUBMITTED_MESSAGE, SUBMITTED_ICON);

        Ok(SubmissionTicket {
            id,
            request: self.roles.to_request(self.task.clone()),
        })
    }

    /// Applies the backend's answer and returns to `Idle`.
    ///
    /// Returns `None` without touching anything when `id` is not the running
    /// submission.
    pub fn complete_submission(
        &mut self,
        id: SubmissionId,
        response: Result<ExecuteTaskResponse, BackendError>,
    ) -> Option<Outcome> {
        if self.phase != Phase::Running(id) {
            return None;
        }
        Some(self.settle(pipeline::settle(response)))
    }

    /// Settles a submission whose response will never be read.
    pub fn abandon_submission(&mut self, id: SubmissionId) -> Option<Outcome> {
        if self.phase != Phase::Running(id) {
            return None;
        }
        Some(self.settle(pipeline::settle_abandoned()))
    }

    fn settle(&mut self, settlement: Settlement) -> Outcome {
        match settlement.log {
            LogUpdate::Replace(entries) => {
                self.activity.clear();
                for entry in entries {
                    self.activity.append_entry(entry);
                }
            }
            LogUpdate::Append(entry) => self.activity.append_entry(entry),
        }
        self.outcome = settlement.outcome;
        self.phase = Phase::Idle;
        self.outcome.clone()
    }

    pub fn view(&self, catalog: Catalog) -> SessionView {
        SessionView {
            task: self.task.clone(),
            roles: self.roles.clone(),
            phase: self.phase,
            outcome: self.outcome.clone(),
            notice: self.notice.clone(),
            activity: self.activity.clone(),
            activity_visible: self.activity_visible,
            catalog,
        }
    }
}

/// Immutable snapshot for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub task: String,
    pub roles: RoleConfiguration,
    pub phase: Phase,
    pub outcome: Outcome,
    pub notice: Option<String>,
    pub activity: ActivityLog,
    pub activity_visible: bool,
    pub catalog: Catalog,
}

impl SessionView {
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn can_submit(&self) -> bool {
        !self.is_running() && !self.task.trim().is_empty()
    }

    pub fn show_examples(&self) -> bool {
        !self.catalog.examples.is_empty() && self.outcome.result().is_none()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.error().or(self.notice.as_deref())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
