//! Plain-text rendering of the session view.

use std::fmt::Write as _;

use client_core::{Catalog, SessionView};
use shared::domain::AgentRole;

pub const WORKING_NOTICE: &str = "Agents are collaborating... This may take 1-3 minutes.";

pub fn team(view: &SessionView) -> String {
    let mut out = String::from("Multi-Agent AI Team\n");
    for role in AgentRole::ALL {
        let model_id = view.roles.model(role);
        let model_name = view.catalog.model_name(model_id).unwrap_or(model_id);
        let _ = writeln!(
            out,
            "  {} {:<10} {:<24} {model_name}",
            role.icon(),
            role.label(),
            role.duty()
        );
    }
    out
}

pub fn examples(catalog: &Catalog) -> String {
    if catalog.examples.is_empty() {
        return "No example tasks available.\n".to_string();
    }
    let mut out = String::from("Example Tasks\n");
    for (index, example) in catalog.examples.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {}: {}", example.title, example.description);
    }
    out
}

pub fn models(catalog: &Catalog) -> String {
    if catalog.models.is_empty() {
        return "No models available.\n".to_string();
    }
    let mut out = String::from("Available Models\n");
    for model in &catalog.models {
        let _ = write!(out, "  {:<14} {}", model.id, model.name);
        if let Some(description) = &model.description {
            let _ = write!(out, " ({description})");
        }
        out.push('\n');
    }
    out
}

pub fn session(view: &SessionView) -> String {
    let mut out = String::new();

    if view.is_running() {
        let _ = writeln!(out, "{WORKING_NOTICE}");
    }

    if let Some(error) = view.error_message() {
        let _ = writeln!(out, "Error: {error}");
    }

    if !view.activity.is_empty() {
        if view.activity_visible {
            out.push_str("Agent Activity Log\n");
            for event in view.activity.events() {
                let mut lines = event.message.lines();
                let first = lines.next().unwrap_or_default();
                let _ = writeln!(out, "  {} {first}  [{}]", event.icon, event.display_time());
                for line in lines {
                    let _ = writeln!(out, "     {line}");
                }
            }
        } else {
            let _ = writeln!(
                out,
                "Agent Activity Log (hidden, {} entries)",
                view.activity.len()
            );
        }
    }

    if let Some(result) = view.outcome.result() {
        let _ = writeln!(out, "Results\n{result}");
    }

    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use client_core::{SessionController, TaskBackend};

    use super::*;

    struct OfflineBackend;

    #[async_trait::async_trait]
    impl TaskBackend for OfflineBackend {
        async fn list_examples(
            &self,
        ) -> Result<Vec<shared::protocol::ExampleTask>, client_core::BackendError> {
            Ok(vec![shared::protocol::ExampleTask {
                title: "Market Research".to_string(),
                description: "Analyze AI chip market trends".to_string(),
                task: "Analyze the current state of the AI chip market.".to_string(),
            }])
        }

        async fn list_models(
            &self,
        ) -> Result<Vec<shared::protocol::ModelInfo>, client_core::BackendError> {
            Ok(vec![shared::protocol::ModelInfo {
                id: "gpt-4o".to_string(),
                name: "GPT-4o (Recommended)".to_string(),
                description: Some("Most capable".to_string()),
            }])
        }

        async fn execute(
            &self,
            _request: &shared::protocol::ExecuteTaskRequest,
        ) -> Result<shared::protocol::ExecuteTaskResponse, client_core::BackendError> {
            Err(client_core::BackendError::Transport(
                "connection refused".to_string(),
            ))
        }

        async fn health(
            &self,
        ) -> Result<shared::protocol::HealthStatus, client_core::BackendError> {
            Err(client_core::BackendError::Transport(
                "connection refused".to_string(),
            ))
        }
    }

    async fn loaded_controller() -> SessionController {
        let controller = SessionController::new(Arc::new(OfflineBackend));
        controller.load_catalog().await;
        controller
    }

    #[tokio::test]
    async fn team_uses_catalog_display_names() {
        let controller = loaded_controller().await;
        let text = team(&controller.view());
        assert!(text.contains("Researcher"));
        assert!(text.contains("GPT-4o (Recommended)"));
    }

    #[tokio::test]
    async fn lists_examples_with_indices() {
        let controller = loaded_controller().await;
        let text = examples(&controller.catalog());
        assert!(text.contains("[0] Market Research: Analyze AI chip market trends"));
        assert!(models(&controller.catalog()).contains("(Most capable)"));
    }

    #[tokio::test]
    async fn failed_run_shows_error_and_log() {
        let controller = loaded_controller().await;
        controller.submit_task("anything").await.expect("submitted");

        let text = session(&controller.view());
        assert!(text.contains("Error: connection refused"));
        assert!(text.contains("Agent Activity Log"));
        assert!(text.contains("❌ connection refused"));

        controller.toggle_activity_log();
        let text = session(&controller.view());
        assert!(text.contains("hidden, 2 entries"));
    }
}
