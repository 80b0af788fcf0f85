use std::pin::Pin;

use crate::errors::SessionError;

/// Single-pass stream of events produced by one streamed response.
pub type EventStream =
    Pin<Box<dyn futures::Stream<Item = Result<StreamEvent, SessionError>> + Send + 'static>>;

/// One incremental unit of output from a streamed workflow response.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    /// Incremental text fragment.
    TextDelta { delta: String },
    /// Completed text segment.
    TextDone { text: String },
    /// An output item started.
    ItemAdded { item: OutputItem },
    /// An output item finished.
    ItemDone { item: OutputItem },
    /// Any event this crate does not model. Holds the raw event.
    Unknown(serde_json::Value),
}

/// Output item carried by `ItemAdded` / `ItemDone`.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputItem {
    /// A step of the remote workflow.
    WorkflowAction(WorkflowAction),
    /// Any other item type. Holds the raw event it arrived in.
    Other(serde_json::Value),
}

/// Lifecycle report for one workflow step.
///
/// Every field keeps whether the remote omitted it, sent `null`, or sent a
/// value, so lifecycle lines render `undefined`, `null` or the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowAction {
    pub action_id: ActionField,
    pub status: ActionField,
    pub previous_action_id: ActionField,
}

impl WorkflowAction {
    pub fn new(action_id: impl Into<ActionField>) -> Self {
        Self {
            action_id: action_id.into(),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: impl Into<ActionField>) -> Self {
        self.status = status.into();
        self
    }

    pub fn previous_action_id(mut self, previous: impl Into<ActionField>) -> Self {
        self.previous_action_id = previous.into();
        self
    }
}

/// One field of a workflow action item as it appeared on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionField {
    /// Key not present on the item.
    #[default]
    Absent,
    /// Key present with a JSON `null`.
    Null,
    Value(String),
}

impl ActionField {
    /// Reads `key` from a JSON item. Strings are taken verbatim; other
    /// values keep their compact JSON text.
    pub fn from_item(item: &serde_json::Value, key: &str) -> Self {
        match item.get(key) {
            None => Self::Absent,
            Some(serde_json::Value::Null) => Self::Null,
            Some(serde_json::Value::String(s)) => Self::Value(s.clone()),
            Some(other) => Self::Value(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl std::fmt::Display for ActionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Value(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ActionField {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for ActionField {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_fields_distinguish_missing_null_and_values() {
        let item = serde_json::json!({"status": null, "action_id": 7, "previous_action_id": "A1"});
        assert_eq!(ActionField::from_item(&item, "missing"), ActionField::Absent);
        assert_eq!(ActionField::from_item(&item, "status"), ActionField::Null);
        assert_eq!(ActionField::from_item(&item, "action_id"), ActionField::from("7"));
        assert_eq!(
            ActionField::from_item(&item, "previous_action_id").as_str(),
            Some("A1")
        );
        assert_eq!(ActionField::Absent.to_string(), "undefined");
        assert_eq!(ActionField::Null.to_string(), "null");
    }
}
