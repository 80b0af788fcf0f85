use futures::StreamExt as _;
use tracing::{debug, warn};

use crate::errors::{HarnessError, SessionError};
use crate::model::{ConversationHandle, ConversationId};
use crate::result::WorkflowResult;
use crate::session::AgentSessionClient;
use crate::stream::{OutputItem, StreamEvent, WorkflowAction};

const ACTION_SEPARATOR: &str = "********************************";

/// Single-owner builder that folds stream events into result sequences.
///
/// Every sequence is append-only and keeps arrival order.
#[derive(Debug, Default)]
pub struct WorkflowAccumulator {
    response_text: String,
    workflow_actions: Vec<String>,
    text_deltas: Vec<String>,
    events_log: Vec<String>,
}

impl WorkflowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. Exactly one branch matches per event and every
    /// event adds one line to the events log.
    pub fn observe(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::TextDone { text } => {
                self.events_log.push(format!("Text done: {text}"));
                self.response_text.push_str(&text);
            }
            StreamEvent::ItemAdded {
                item: OutputItem::WorkflowAction(action),
            } => {
                let line = format!("Actor - '{}'", action.action_id);
                self.events_log.push(format!("{ACTION_SEPARATOR}\n{line}"));
                self.workflow_actions.push(line);
            }
            StreamEvent::ItemDone {
                item: OutputItem::WorkflowAction(action),
            } => {
                let line = describe_action_done(&action);
                self.events_log.push(line.clone());
                self.workflow_actions.push(line);
            }
            StreamEvent::TextDelta { delta } => {
                self.events_log.push(format!("Text delta: {delta}"));
                self.text_deltas.push(delta);
            }
            StreamEvent::ItemAdded {
                item: OutputItem::Other(raw),
            }
            | StreamEvent::ItemDone {
                item: OutputItem::Other(raw),
            }
            | StreamEvent::Unknown(raw) => {
                self.events_log.push(format!("Unknown event: {raw}"));
            }
        }
    }

    pub fn events_log(&self) -> &[String] {
        &self.events_log
    }

    /// Seals the accumulated sequences once the conversation is gone.
    fn finish(self, conversation_id: ConversationId) -> WorkflowResult {
        WorkflowResult::completed(
            conversation_id,
            self.response_text,
            self.workflow_actions,
            self.text_deltas,
            self.events_log,
        )
    }
}

/// Fields the remote omitted render as `undefined`, explicit nulls as `null`.
fn describe_action_done(action: &WorkflowAction) -> String {
    format!(
        "Workflow Item '{}' is '{}' - (previous item was: '{}')",
        action.action_id, action.status, action.previous_action_id,
    )
}

/// Drains `stream`, deletes the conversation, and returns the aggregate.
///
/// A stream error is returned unchanged and the conversation is left open:
/// teardown only runs after a complete drain.
pub async fn aggregate<C, S>(
    client: &C,
    conversation: &ConversationHandle,
    mut stream: S,
) -> Result<WorkflowResult, HarnessError>
where
    C: AgentSessionClient + ?Sized,
    S: futures::Stream<Item = Result<StreamEvent, SessionError>> + Unpin,
{
    let conversation_id = conversation.id.clone();
    let mut accumulator = WorkflowAccumulator::new();

    while let Some(next) = stream.next().await {
        match next {
            Ok(event) => {
                accumulator.observe(event);
                if let Some(line) = accumulator.events_log().last() {
                    debug!(conversation_id = %conversation_id, "{line}");
                }
            }
            Err(err) => {
                warn!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "workflow stream failed; conversation was not deleted"
                );
                return Err(err.into());
            }
        }
    }

    client.delete_conversation(&conversation_id).await?;
    debug!(conversation_id = %conversation_id, "conversation deleted");

    Ok(accumulator.finish(conversation_id))
}
