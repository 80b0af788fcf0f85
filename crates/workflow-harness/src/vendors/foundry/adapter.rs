use std::collections::VecDeque;
use std::pin::Pin;

use futures::StreamExt as _;
use futures::stream;
use tracing::debug;

use crate::errors::{HarnessError, SessionError};
use crate::model::{AgentInfo, ConversationHandle, ConversationId};
use crate::session::AgentSessionClient;
use crate::stream::{EventStream, StreamEvent};

use super::config::FoundryClientConfig;
use super::transport::{SseDecoder, SseFrame, map_frame_to_event};

type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static>>;

/// Session client for an Azure AI Foundry project (OpenAI-compatible
/// conversations and streamed responses).
pub struct FoundryClient {
    client: reqwest::Client,
    config: FoundryClientConfig,
    base_url: reqwest::Url,
}

impl FoundryClient {
    /// Creates a client from explicit configuration.
    pub fn new(config: FoundryClientConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let base_url = reqwest::Url::parse(config.endpoint.trim()).map_err(|e| {
            HarnessError::Config(format!("invalid project endpoint {}: {e}", config.endpoint))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HarnessError::Config(format!(
                "invalid project endpoint {}: not a base URL",
                config.endpoint
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| HarnessError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &FoundryClientConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &self.config.api_version);
        url
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, SessionError> {
        let response = request
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| SessionError::transport(format!("{what} request failed: {e}")))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(SessionError::provider(
            format!("{what} failed with status {status}: {body}"),
            Some(status.as_u16()),
        ))
    }

    pub(crate) fn build_response_body(
        &self,
        conversation_id: &ConversationId,
        prompt: &str,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "conversation": conversation_id,
            "input": prompt,
            "stream": true,
            "agent": {
                "name": self.config.agent_name,
                "type": "agent_reference",
            },
        });
        if self.config.debug_mode {
            body["metadata"] = serde_json::json!({ "x-ms-debug-mode-enabled": "1" });
        }
        body
    }
}

#[derive(serde::Deserialize)]
struct ConversationObject {
    id: String,
    #[serde(default)]
    created_at: Option<i64>,
}

#[derive(serde::Deserialize)]
struct AgentObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    versions: Option<AgentVersions>,
}

#[derive(serde::Deserialize)]
struct AgentVersions {
    #[serde(default)]
    latest: Option<AgentVersion>,
}

#[derive(serde::Deserialize)]
struct AgentVersion {
    #[serde(default)]
    version: Option<String>,
}

#[async_trait::async_trait]
impl AgentSessionClient for FoundryClient {
    async fn resolve_agent(&self) -> Result<AgentInfo, SessionError> {
        let url = self.url(&["agents", self.config.agent_name.as_str()]);
        debug!(agent = %self.config.agent_name, "looking up agent");
        let response = self
            .send(
                self.client.get(url).timeout(self.config.request_timeout),
                "agent lookup",
            )
            .await?;
        let agent: AgentObject = response
            .json()
            .await
            .map_err(|e| SessionError::protocol(format!("invalid agent payload: {e}")))?;
        Ok(AgentInfo {
            name: agent.name.unwrap_or_else(|| self.config.agent_name.clone()),
            id: agent.id,
            latest_version: agent
                .versions
                .and_then(|v| v.latest)
                .and_then(|latest| latest.version),
        })
    }

    async fn open_conversation(&self) -> Result<ConversationHandle, SessionError> {
        let url = self.url(&["openai", "conversations"]);
        let response = self
            .send(
                self.client
                    .post(url)
                    .timeout(self.config.request_timeout)
                    .json(&serde_json::json!({})),
                "create conversation",
            )
            .await?;
        let conversation: ConversationObject = response
            .json()
            .await
            .map_err(|e| SessionError::protocol(format!("invalid conversation payload: {e}")))?;
        Ok(ConversationHandle {
            id: ConversationId::new(conversation.id),
            created_at: conversation.created_at,
        })
    }

    async fn stream_response(
        &self,
        conversation_id: &ConversationId,
        prompt: &str,
    ) -> Result<EventStream, SessionError> {
        let url = self.url(&["openai", "responses"]);
        let body = self.build_response_body(conversation_id, prompt);
        debug!(conversation_id = %conversation_id, agent = %self.config.agent_name, "starting response stream");

        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body);
        if let Some(timeout) = self.config.stream_timeout {
            request = request.timeout(timeout);
        }
        let response = self.send(request, "create response").await?;

        let bytes_stream: ByteStream = Box::pin(response.bytes_stream());
        Ok(Box::pin(foundry_event_stream(bytes_stream)))
    }

    async fn delete_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), SessionError> {
        let url = self.url(&["openai", "conversations", conversation_id.as_str()]);
        self.send(
            self.client.delete(url).timeout(self.config.request_timeout),
            "delete conversation",
        )
        .await?;
        Ok(())
    }
}

fn foundry_event_stream(
    bytes_stream: ByteStream,
) -> impl futures::Stream<Item = Result<StreamEvent, SessionError>> + Send {
    struct State {
        bytes_stream: ByteStream,
        decoder: SseDecoder,
        // A failed frame is queued behind the events decoded before it.
        pending: VecDeque<Result<StreamEvent, SessionError>>,
        done: bool,
    }

    impl State {
        fn queue_frame(&mut self, frame: &SseFrame) {
            match map_frame_to_event(frame) {
                Ok(Some(event)) => self.pending.push_back(Ok(event)),
                Ok(None) => {}
                Err(err) => {
                    self.pending.push_back(Err(err));
                    self.done = true;
                }
            }
        }
    }

    stream::try_unfold(
        State {
            bytes_stream,
            decoder: SseDecoder::default(),
            pending: VecDeque::new(),
            done: false,
        },
        |mut state| async move {
            loop {
                if let Some(next) = state.pending.pop_front() {
                    return next.map(|event| Some((event, state)));
                }
                if state.done {
                    return Ok(None);
                }

                match state.bytes_stream.next().await {
                    Some(Ok(chunk)) => {
                        for frame in state.decoder.push_chunk(&chunk) {
                            state.queue_frame(&frame);
                            if state.done {
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(SessionError::transport(format!(
                            "response stream read failed: {e}"
                        )));
                    }
                    None => {
                        state.done = true;
                        if let Some(frame) = state.decoder.finish() {
                            state.queue_frame(&frame);
                        }
                    }
                }
            }
        },
    )
}
