use std::path::{Path, PathBuf};
use std::time::Duration;

use workflow_harness::HarnessError;
use workflow_harness::vendors::foundry::{
    DEFAULT_AGENT_NAME, DEFAULT_API_VERSION, FoundryClientConfig,
};

pub const ENDPOINT_REQUIRED: &str =
    "AZURE_EXISTING_AIPROJECT_ENDPOINT or PROJECT_ENDPOINT environment variable is required";
pub const ACCESS_TOKEN_REQUIRED: &str = "AZURE_AI_ACCESS_TOKEN environment variable is required";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Load `.env` files into the process environment.
///
/// The crate-local `.env` is read first, then the working directory's.
/// Missing files are ignored.
pub fn init() {
    let _ = dotenvy::from_path(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/.env")));
    dotenvy::dotenv().ok();
}

/// Logging settings, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    /// Filter directive (`info`, `workflow_harness=debug`, ...).
    pub filter: Option<String>,
    /// When set, logs are written as JSON lines to this file.
    pub json_log_path: Option<PathBuf>,
}

/// Settings for the remote agent project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub agent_name: String,
    pub api_version: String,
    pub request_timeout: Duration,
    pub stream_timeout: Option<Duration>,
}

impl AgentConfig {
    /// Builds the client config, failing with the literal message for the
    /// first missing required setting.
    pub fn client_config(&self) -> Result<FoundryClientConfig, HarnessError> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| HarnessError::Config(ENDPOINT_REQUIRED.into()))?;
        let access_token = self
            .access_token
            .clone()
            .ok_or_else(|| HarnessError::Config(ACCESS_TOKEN_REQUIRED.into()))?;
        Ok(FoundryClientConfig::new(endpoint, access_token)
            .agent_name(self.agent_name.clone())
            .api_version(self.api_version.clone())
            .request_timeout(self.request_timeout)
            .stream_timeout(self.stream_timeout))
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for any path not matched by an API route.
    pub static_dir: PathBuf,
}

/// Process configuration, built once and passed down explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let agent = AgentConfig {
            endpoint: get("AZURE_EXISTING_AIPROJECT_ENDPOINT").or_else(|| get("PROJECT_ENDPOINT")),
            access_token: get("AZURE_AI_ACCESS_TOKEN"),
            agent_name: get("AZURE_AGENT_NAME").unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            api_version: get("AZURE_AI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            request_timeout: Duration::from_secs(
                parse_or("AZURE_AI_REQUEST_TIMEOUT_SECS", get("AZURE_AI_REQUEST_TIMEOUT_SECS"))
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            stream_timeout: parse_or(
                "AZURE_AI_STREAM_TIMEOUT_SECS",
                get("AZURE_AI_STREAM_TIMEOUT_SECS"),
            )
            .map(Duration::from_secs),
        };

        let server = ServerConfig {
            host: DEFAULT_BIND_HOST.to_string(),
            port: parse_or("PORT", get("PORT")).unwrap_or(DEFAULT_PORT),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        };

        let enabled = ["WORKFLOW_OBSERVABILITY_ENABLED", "WORKFLOW_OBSERVABILITY"]
            .into_iter()
            .find_map(|key| get(key))
            .map(|value| parse_bool(&value).unwrap_or(true))
            .unwrap_or(true);
        let log = LogConfig {
            enabled,
            filter: get("WORKFLOW_LOG_LEVEL").or_else(|| get("RUST_LOG")),
            json_log_path: get("WORKFLOW_JSON_LOG_PATH").map(PathBuf::from),
        };

        Self { agent, server, log }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::error!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}
