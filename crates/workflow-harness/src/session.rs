use crate::errors::SessionError;
use crate::model::{AgentInfo, ConversationHandle, ConversationId};
use crate::stream::EventStream;

/// Client for a remote agent/workflow service.
///
/// Implementations own transport and credentials. Errors are returned as-is
/// to the harness, which never retries them.
#[async_trait::async_trait]
pub trait AgentSessionClient: Send + Sync {
    /// Looks up the configured agent on the remote service.
    async fn resolve_agent(&self) -> Result<AgentInfo, SessionError>;

    /// Opens a new conversation.
    async fn open_conversation(&self) -> Result<ConversationHandle, SessionError>;

    /// Submits `prompt` to the conversation and returns its event stream.
    async fn stream_response(
        &self,
        conversation_id: &ConversationId,
        prompt: &str,
    ) -> Result<EventStream, SessionError>;

    /// Deletes a conversation. Not assumed to be idempotent.
    async fn delete_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), SessionError>;
}
