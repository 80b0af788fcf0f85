use std::time::Duration;

use crate::errors::HarnessError;

/// Default agent/workflow name used when none is configured.
pub const DEFAULT_AGENT_NAME: &str = "petetestworkflow01";
/// Default `api-version` query value for project endpoints.
pub const DEFAULT_API_VERSION: &str = "2025-11-15-preview";

/// Configuration for the Foundry project client.
#[derive(Clone, Debug)]
pub struct FoundryClientConfig {
    /// Project endpoint, for example
    /// `https://<resource>.services.ai.azure.com/api/projects/<project>`.
    pub endpoint: String,
    /// Bearer access token for the project. Acquired outside this crate.
    pub access_token: String,
    /// Agent/workflow referenced by every response request.
    pub agent_name: String,
    /// `api-version` query parameter sent with every call.
    pub api_version: String,
    /// Timeout for the non-streaming calls (agent lookup, open, delete).
    pub request_timeout: Duration,
    /// Optional bound on a whole streamed response. Unbounded when `None`.
    pub stream_timeout: Option<Duration>,
    /// Sends `x-ms-debug-mode-enabled` metadata with response requests.
    pub debug_mode: bool,
}

impl FoundryClientConfig {
    /// Creates a config with defaults for everything but the endpoint and token.
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(120),
            stream_timeout: None,
            debug_mode: true,
        }
    }

    pub fn agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn stream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stream_timeout = timeout;
        self
    }

    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), HarnessError> {
        if self.endpoint.trim().is_empty() {
            return Err(HarnessError::Config(
                "Foundry client config endpoint must not be empty".into(),
            ));
        }
        if self.access_token.trim().is_empty() {
            return Err(HarnessError::Config(
                "Foundry client config access_token must not be empty".into(),
            ));
        }
        if self.agent_name.trim().is_empty() {
            return Err(HarnessError::Config(
                "Foundry client config agent_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reference_the_fixed_agent_and_leave_streams_unbounded() {
        let config = FoundryClientConfig::new("https://example.test/api/projects/p", "tok");
        assert_eq!(config.agent_name, DEFAULT_AGENT_NAME);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(config.stream_timeout.is_none());
        assert!(config.debug_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_token_is_a_config_error() {
        let err = FoundryClientConfig::new("https://example.test", "  ")
            .validate()
            .expect_err("blank token");
        assert!(matches!(err, HarnessError::Config(message) if message.contains("access_token")));
    }
}
