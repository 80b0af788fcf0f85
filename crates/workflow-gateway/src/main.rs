//! Workflow gateway: HTTP server or one-shot invocation.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use workflow_gateway::observability::init_observability;
use workflow_gateway::{AppConfig, AppState, build_harness, config, serve};

const DEMO_PROMPT: &str = "Product Concept: HoloNest. Tagline: Bring your world into focus. Features Adaptive Reality Pods, MoodSync AI, Multi-user layering, zero-lag gesture control, and eco-recharge cells. Target Audience is Create Professional and community organizers.";

#[derive(Debug, Parser)]
#[command(
    name = "workflow-gateway",
    about = "Run prompts through a remote agent workflow"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// Overrides `PORT`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one prompt and print the result as JSON.
    Invoke {
        /// Prompt text. A built-in product brief is used when omitted.
        #[arg(long)]
        input: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    config::init();
    let app_config = AppConfig::from_env();
    init_observability(&app_config.log);
    info!(
        endpoint = if app_config.agent.endpoint.is_some() { "SET" } else { "NOT SET" },
        agent = %app_config.agent.agent_name,
        "environment loaded"
    );

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let mut server_config = app_config.server.clone();
            if let Some(port) = port {
                server_config.port = port;
            }
            let state = AppState::from_config(&app_config.agent);
            serve(&server_config, state)
                .await
                .context("HTTP server failed")?;
        }
        Command::Invoke { input } => {
            let prompt = input.unwrap_or_else(|| DEMO_PROMPT.to_string());
            let harness = build_harness(&app_config.agent)?;
            let result = harness
                .invoke_workflow(&prompt)
                .await
                .inspect_err(|err| error!(error = %err, "workflow failed"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            info!("workflow completed successfully");
        }
    }
    Ok(())
}
