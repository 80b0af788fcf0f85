use std::sync::Mutex;

use futures::stream;

use crate::errors::SessionError;
use crate::model::{AgentInfo, ConversationHandle, ConversationId};
use crate::session::AgentSessionClient;
use crate::stream::{EventStream, StreamEvent};

/// In-memory session client that replays a fixed event list.
#[derive(Default)]
pub(crate) struct FakeSessionClient {
    events: Vec<Result<StreamEvent, SessionError>>,
    open_error: Option<SessionError>,
    delete_error: Option<SessionError>,
    prompts: Mutex<Vec<String>>,
    deleted: Mutex<Vec<ConversationId>>,
}

impl FakeSessionClient {
    pub(crate) fn with_events(events: Vec<Result<StreamEvent, SessionError>>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub(crate) fn failing_open(mut self, err: SessionError) -> Self {
        self.open_error = Some(err);
        self
    }

    pub(crate) fn failing_delete(mut self, err: SessionError) -> Self {
        self.delete_error = Some(err);
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub(crate) fn deleted(&self) -> Vec<ConversationId> {
        self.deleted.lock().expect("deleted lock").clone()
    }
}

#[async_trait::async_trait]
impl AgentSessionClient for FakeSessionClient {
    async fn resolve_agent(&self) -> Result<AgentInfo, SessionError> {
        Ok(AgentInfo {
            name: "fake-agent".into(),
            ..AgentInfo::default()
        })
    }

    async fn open_conversation(&self) -> Result<ConversationHandle, SessionError> {
        match &self.open_error {
            Some(err) => Err(err.clone()),
            None => Ok(ConversationHandle::new("conv_1")),
        }
    }

    async fn stream_response(
        &self,
        _conversation_id: &ConversationId,
        prompt: &str,
    ) -> Result<EventStream, SessionError> {
        self.prompts.lock().expect("prompts lock").push(prompt.to_string());
        Ok(Box::pin(stream::iter(self.events.clone())))
    }

    async fn delete_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), SessionError> {
        if let Some(err) = &self.delete_error {
            return Err(err.clone());
        }
        self.deleted
            .lock()
            .expect("deleted lock")
            .push(conversation_id.clone());
        Ok(())
    }
}
