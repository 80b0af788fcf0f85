use std::fmt;

/// Opaque identifier of a remote conversation.
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Creates a conversation id from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A conversation opened on the remote service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationHandle {
    /// Id assigned by the service.
    pub id: ConversationId,
    /// Unix creation time reported by the service, when present.
    pub created_at: Option<i64>,
}

impl ConversationHandle {
    pub fn new(id: impl Into<ConversationId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
        }
    }
}

/// Agent/workflow definition as reported by the remote service.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AgentInfo {
    /// Agent name used in `agent_reference` requests.
    pub name: String,
    /// Service-side id, when reported.
    pub id: Option<String>,
    /// Latest published version, when reported.
    pub latest_version: Option<String>,
}
