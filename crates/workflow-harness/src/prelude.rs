//! Common imports for typical harness usage.
pub use crate::{
    AgentSessionClient, ConversationId, EventStream, Harness, HarnessBuilder, HarnessError,
    OutputItem, SessionError, StreamEvent, WorkflowAction, WorkflowResult, WorkflowStatus,
};
