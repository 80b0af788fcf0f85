use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use workflow_harness::HarnessError;

/// JSON error body returned by the API.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
}

/// Failure of an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body has no usable `input`.
    #[error("input is required: {0}")]
    MissingInput(String),
    /// Workflow invocation failed (configuration, validation, or session).
    #[error(transparent)]
    Workflow(#[from] HarnessError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput(_) | Self::Workflow(HarnessError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Workflow(HarnessError::Config(_) | HarnessError::Session(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::MissingInput(message) => ErrorEnvelope {
                error: "Input is required".into(),
                message: message.clone(),
            },
            Self::Workflow(HarnessError::Validation(message)) => ErrorEnvelope {
                error: "Input is required".into(),
                message: message.clone(),
            },
            Self::Workflow(err) => ErrorEnvelope {
                error: "Workflow execution failed".into(),
                message: err.message().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_harness::SessionError;

    #[test]
    fn session_failures_are_server_errors_with_inner_message() {
        let err = ApiError::from(HarnessError::from(SessionError::transport("reset")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = err.envelope();
        assert_eq!(envelope.error, "Workflow execution failed");
        assert_eq!(envelope.message, "reset");
    }

    #[test]
    fn missing_input_is_a_bad_request() {
        let err = ApiError::MissingInput("no input".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.envelope().error, "Input is required");
    }
}
