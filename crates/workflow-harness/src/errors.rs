/// Errors raised by an agent session client while talking to the remote
/// service. They reach callers unchanged; nothing here retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Remote service returned an application-level failure (HTTP status,
    /// auth, or an `error` event inside the stream).
    #[error("{message}")]
    Provider {
        message: String,
        status_code: Option<u16>,
    },
    /// Transport or stream I/O failed.
    #[error("{message}")]
    Transport { message: String },
    /// Response shape was not what the client expected.
    #[error("{message}")]
    Protocol { message: String },
}

impl SessionError {
    /// Creates a provider-level error.
    pub fn provider(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Provider {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a protocol-level error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns the human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Provider { message, .. }
            | Self::Transport { message }
            | Self::Protocol { message } => message,
        }
    }

    /// HTTP status reported by the remote service, when there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Provider { status_code, .. } => *status_code,
            Self::Transport { .. } | Self::Protocol { .. } => None,
        }
    }
}

/// Top-level error type for the public harness API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    /// Required configuration is missing or invalid. Raised before any
    /// conversation is opened.
    #[error("config error: {0}")]
    Config(String),
    /// Caller input was rejected before reaching the remote service.
    #[error("validation error: {0}")]
    Validation(String),
    /// Failure opening, streaming, or deleting the remote conversation.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl HarnessError {
    /// Returns the inner message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config(message) | Self::Validation(message) => message,
            Self::Session(err) => err.message(),
        }
    }
}
