use crate::model::ConversationId;

/// Terminal status of a workflow invocation.
///
/// Failures never produce a result, so `Success` is the only value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Success,
}

/// Aggregated outcome of one streamed workflow response.
///
/// Built by [`WorkflowAccumulator`](crate::aggregate::WorkflowAccumulator) and
/// read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowResult {
    conversation_id: ConversationId,
    response_text: String,
    workflow_actions: Vec<String>,
    text_deltas: Vec<String>,
    events_log: Vec<String>,
    conversation_deleted: bool,
    status: WorkflowStatus,
}

impl WorkflowResult {
    pub(crate) fn completed(
        conversation_id: ConversationId,
        response_text: String,
        workflow_actions: Vec<String>,
        text_deltas: Vec<String>,
        events_log: Vec<String>,
    ) -> Self {
        Self {
            conversation_id,
            response_text,
            workflow_actions,
            text_deltas,
            events_log,
            conversation_deleted: true,
            status: WorkflowStatus::Success,
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Concatenation of every completed text segment, in arrival order.
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    pub fn workflow_actions(&self) -> &[String] {
        &self.workflow_actions
    }

    pub fn text_deltas(&self) -> &[String] {
        &self.text_deltas
    }

    /// One trace line per observed event, recognized or not.
    pub fn events_log(&self) -> &[String] {
        &self.events_log
    }

    pub fn conversation_deleted(&self) -> bool {
        self.conversation_deleted
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_keys_and_lowercase_status() {
        let result = WorkflowResult::completed(
            ConversationId::new("conv_1"),
            "hi".into(),
            vec![],
            vec!["h".into(), "i".into()],
            vec!["Text delta: h".into()],
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["conversation_id"], "conv_1");
        assert_eq!(value["response_text"], "hi");
        assert_eq!(value["text_deltas"], serde_json::json!(["h", "i"]));
        assert_eq!(value["conversation_deleted"], true);
        assert_eq!(value["status"], "success");
    }
}
