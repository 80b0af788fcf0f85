use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use workflow_harness::vendors::foundry::FoundryClient;
use workflow_harness::{Harness, HarnessError, WorkflowResult};

use crate::config::{AgentConfig, ServerConfig};
use crate::error::ApiError;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<Backend>,
}

enum Backend {
    Ready(Harness),
    /// Configuration was incomplete at startup; every workflow call reports it.
    Misconfigured(HarnessError),
}

impl AppState {
    pub fn ready(harness: Harness) -> Self {
        Self {
            backend: Arc::new(Backend::Ready(harness)),
        }
    }

    pub fn misconfigured(err: HarnessError) -> Self {
        Self {
            backend: Arc::new(Backend::Misconfigured(err)),
        }
    }

    /// Builds the Foundry-backed harness, keeping any configuration error
    /// for request time so the server still starts.
    pub fn from_config(config: &AgentConfig) -> Self {
        match build_harness(config) {
            Ok(harness) => Self::ready(harness),
            Err(err) => {
                warn!(error = %err, "workflow backend is not configured");
                Self::misconfigured(err)
            }
        }
    }

    fn harness(&self) -> Result<&Harness, ApiError> {
        match self.backend.as_ref() {
            Backend::Ready(harness) => Ok(harness),
            Backend::Misconfigured(err) => Err(ApiError::Workflow(err.clone())),
        }
    }
}

/// Builds a harness over the Foundry project client.
pub fn build_harness(config: &AgentConfig) -> Result<Harness, HarnessError> {
    let client = FoundryClient::new(config.client_config()?)?;
    info!(endpoint = %client.config().endpoint, agent = %client.config().agent_name, "created project client");
    Harness::builder().session_client(Arc::new(client)).build()
}

/// Body of `POST /api/workflow`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub input: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Build the Axum router with all routes.
///
/// Paths not matched by an API route are served from `static_dir` when that
/// directory exists.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/workflow", post(workflow_handler))
        .with_state(state);
    let router = if static_dir.is_dir() {
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    };
    router.layer(TraceLayer::new_for_http())
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let router = build_router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let port = listener.local_addr()?.port();

    info!(host = %config.host, port, "server running");
    info!("health check: http://localhost:{port}/health");
    info!("workflow API: POST http://localhost:{port}/api/workflow");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

async fn workflow_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkflowRequest>, JsonRejection>,
) -> Result<Json<WorkflowResult>, ApiError> {
    info!("workflow API called");
    let input = match payload {
        Ok(Json(WorkflowRequest { input: Some(input) })) if !input.is_empty() => input,
        Ok(_) => {
            warn!("no input provided");
            return Err(ApiError::MissingInput(
                "request body must include a non-empty `input` string".into(),
            ));
        }
        Err(rejection) => {
            let message = rejection.body_text();
            warn!(error = %message, "rejected workflow request body");
            return Err(ApiError::MissingInput(message));
        }
    };

    let harness = state.harness().inspect_err(|err| {
        error!(error = %err, "workflow failed");
    })?;
    info!("starting workflow execution");
    match harness.invoke_workflow(&input).await {
        Ok(result) => {
            info!(conversation_id = %result.conversation_id(), "workflow completed successfully");
            Ok(Json(result))
        }
        Err(err) => {
            error!(error = %err, "workflow failed");
            Err(err.into())
        }
    }
}
