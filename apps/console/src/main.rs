use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AssistantCapabilities, CapabilityBridge, HttpTaskBackend, RoleConfiguration,
    SessionController, SessionError, TaskBackend,
};
use serde::Deserialize;
use serde_json::Value;
use shared::domain::AgentRole;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod settings;

use settings::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "magentic-console",
    about = "Submit a task to the multi-agent execution service and follow its progress"
)]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "console.toml")]
    settings: PathBuf,
    #[arg(long)]
    task: Option<String>,
    /// Index into the example list; replaces the task text.
    #[arg(long)]
    example: Option<usize>,
    #[arg(long)]
    researcher_model: Option<String>,
    #[arg(long)]
    coder_model: Option<String>,
    #[arg(long)]
    manager_model: Option<String>,
    #[arg(long)]
    reviewer_model: Option<String>,
    #[arg(long)]
    list_examples: bool,
    #[arg(long)]
    list_models: bool,
    #[arg(long)]
    hide_activity: bool,
    #[arg(long)]
    health: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expose the session to an assistant runtime.
    Assistant {
        #[command(subcommand)]
        action: AssistantCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AssistantCommand {
    /// Print the capability manifest as JSON.
    Manifest,
    /// Read one `{"action": ..., "arguments": {...}}` object from stdin and run it.
    Invoke,
}

#[derive(Debug, Deserialize)]
struct Invocation {
    action: String,
    #[serde(default)]
    arguments: Value,
}

impl Args {
    fn role_overrides(&self) -> [(AgentRole, Option<&String>); 4] {
        [
            (AgentRole::Researcher, self.researcher_model.as_ref()),
            (AgentRole::Coder, self.coder_model.as_ref()),
            (AgentRole::Manager, self.manager_model.as_ref()),
            (AgentRole::Reviewer, self.reviewer_model.as_ref()),
        ]
    }
}

fn build_backend(settings: &Settings) -> Result<HttpTaskBackend> {
    match settings.request_timeout() {
        Some(timeout) => HttpTaskBackend::with_timeout(&settings.server_url, timeout)
            .context("failed to build http client"),
        None => Ok(HttpTaskBackend::new(&settings.server_url)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.settings)?;
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    settings.validate()?;
    info!(server_url = %settings.server_url, "console: starting");

    let backend = Arc::new(build_backend(&settings)?);
    if args.health {
        let health = backend
            .health()
            .await
            .map_err(|e| anyhow::anyhow!(e.description()))
            .context("health check failed")?;
        println!(
            "status={} agents_initialized={}",
            health.status, health.agents_initialized
        );
        return Ok(());
    }

    let controller = Arc::new(SessionController::with_roles(
        backend,
        RoleConfiguration::uniform(&settings.default_model),
    ));
    controller.load_catalog().await;

    if let Some(Command::Assistant { action }) = &args.command {
        return run_assistant(controller, action).await;
    }

    if args.list_examples || args.list_models {
        let catalog = controller.catalog();
        if args.list_examples {
            print!("{}", render::examples(&catalog));
        }
        if args.list_models {
            print!("{}", render::models(&catalog));
        }
        return Ok(());
    }

    for (role, model_id) in args.role_overrides() {
        if let Some(model_id) = model_id {
            controller.set_role_model(role, model_id)?;
        }
    }
    if let Some(index) = args.example {
        controller
            .load_example(index)
            .with_context(|| format!("cannot load example {index}"))?;
    }
    if let Some(task) = &args.task {
        controller.set_task(task.clone())?;
    }

    print!("{}", render::team(&controller.view()));
    println!("{}", render::WORKING_NOTICE);

    let submitted = controller.submit().await;
    if args.hide_activity {
        controller.toggle_activity_log();
    }
    let view = controller.view();
    print!("{}", render::session(&view));

    match submitted {
        Err(SessionError::EmptyTask) => bail!("no task given; use --task or --example"),
        Err(err) => Err(err.into()),
        Ok(_) if view.outcome.error().is_some() => bail!("task execution failed"),
        Ok(_) => Ok(()),
    }
}

async fn run_assistant(controller: Arc<SessionController>, action: &AssistantCommand) -> Result<()> {
    let bridge = CapabilityBridge::new(controller.clone());
    match action {
        AssistantCommand::Manifest => {
            println!("{}", serde_json::to_string_pretty(&bridge.manifest())?);
        }
        AssistantCommand::Invoke => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read invocation from stdin")?;
            let invocation: Invocation =
                serde_json::from_str(&raw).context("invocation must be a JSON object")?;
            let reply = bridge
                .invoke(&invocation.action, invocation.arguments)
                .await?;
            println!("{reply}");
            eprint!("{}", render::session(&controller.view()));
        }
    }
    Ok(())
}
