use std::sync::Arc;

use tracing::{Instrument as _, debug, info, info_span};

use crate::aggregate::aggregate;
use crate::errors::HarnessError;
use crate::result::WorkflowResult;
use crate::session::AgentSessionClient;

const PROMPT_PREVIEW_CHARS: usize = 50;

/// Entry point for running prompts through a remote agent workflow.
///
/// Cloning is cheap; clones share the same session client. No per-invocation
/// state lives here.
#[derive(Clone)]
pub struct Harness {
    client: Arc<dyn AgentSessionClient>,
}

impl Harness {
    /// Starts a builder for registering the session client.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Runs one prompt end to end: resolve the agent, open a conversation,
    /// stream the response into a [`WorkflowResult`], and delete the
    /// conversation.
    pub async fn invoke_workflow(&self, prompt: &str) -> Result<WorkflowResult, HarnessError> {
        if prompt.is_empty() {
            return Err(HarnessError::Validation("prompt must not be empty".into()));
        }
        let invocation_id = uuid::Uuid::new_v4();
        let span = info_span!("invoke_workflow", %invocation_id);
        self.run(prompt).instrument(span).await
    }

    async fn run(&self, prompt: &str) -> Result<WorkflowResult, HarnessError> {
        let preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        info!(prompt = %preview, "starting workflow");

        let agent = self.client.resolve_agent().await?;
        debug!(agent = %agent.name, agent_id = ?agent.id, version = ?agent.latest_version, "resolved agent");

        let conversation = self.client.open_conversation().await?;
        info!(conversation_id = %conversation.id, "conversation created");

        let stream = self
            .client
            .stream_response(&conversation.id, prompt)
            .await?;
        let result = aggregate(self.client.as_ref(), &conversation, stream).await?;

        info!(
            conversation_id = %result.conversation_id(),
            events = result.events_log().len(),
            workflow_actions = result.workflow_actions().len(),
            "workflow completed"
        );
        if tracing::enabled!(tracing::Level::DEBUG)
            && let Ok(pretty) = serde_json::to_string_pretty(&result)
        {
            debug!("workflow result\n{pretty}");
        }
        Ok(result)
    }
}

/// Builder used to attach a session client before creating a `Harness`.
#[derive(Default)]
pub struct HarnessBuilder {
    client: Option<Arc<dyn AgentSessionClient>>,
}

impl HarnessBuilder {
    /// Sets the client used to reach the remote agent service.
    pub fn session_client(mut self, client: Arc<dyn AgentSessionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the harness. Fails when no session client was registered.
    pub fn build(self) -> Result<Harness, HarnessError> {
        let client = self.client.ok_or_else(|| {
            HarnessError::Config("an agent session client must be registered".into())
        })?;
        Ok(Harness { client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SessionError;
    use crate::stream::StreamEvent;
    use crate::testing::FakeSessionClient;

    fn harness_with(client: Arc<FakeSessionClient>) -> Harness {
        Harness::builder()
            .session_client(client)
            .build()
            .expect("build harness")
    }

    #[test]
    fn build_requires_a_session_client() {
        let result = Harness::builder().build();
        assert!(
            matches!(result, Err(HarnessError::Config(message)) if message.contains("session client"))
        );
    }

    #[tokio::test]
    async fn invoke_streams_prompt_and_deletes_conversation() {
        let client = Arc::new(FakeSessionClient::with_events(vec![
            Ok(StreamEvent::TextDelta { delta: "Hi".into() }),
            Ok(StreamEvent::TextDone { text: "Hi".into() }),
        ]));
        let harness = harness_with(client.clone());

        let result = harness.invoke_workflow("Say hi").await.expect("invoke");

        assert_eq!(result.response_text(), "Hi");
        assert_eq!(client.prompts(), vec!["Say hi".to_string()]);
        assert_eq!(client.deleted().len(), 1);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_session_call() {
        let client = Arc::new(FakeSessionClient::default());
        let harness = harness_with(client.clone());

        let err = harness.invoke_workflow("").await.expect_err("empty prompt");

        assert!(matches!(err, HarnessError::Validation(_)));
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn open_failure_surfaces_session_error() {
        let client = Arc::new(
            FakeSessionClient::default()
                .failing_open(SessionError::provider("unauthorized", Some(401))),
        );
        let harness = harness_with(client.clone());

        let err = harness.invoke_workflow("hello").await.expect_err("open failure");

        assert_eq!(err.message(), "unauthorized");
        assert!(client.prompts().is_empty());
        assert!(client.deleted().is_empty());
    }
}
