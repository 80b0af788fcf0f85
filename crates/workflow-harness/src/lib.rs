//! Runs a prompt through a remote agent workflow and folds the streamed
//! response into one [`WorkflowResult`].
//!
//! Vendor-specific clients are namespaced under `vendors::*`.
//!
//! # Usage (Azure AI Foundry)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use workflow_harness::prelude::*;
//! use workflow_harness::vendors::foundry::{FoundryClient, FoundryClientConfig};
//!
//! # async fn demo() -> Result<(), HarnessError> {
//! let config = FoundryClientConfig::new(
//!     "https://my-resource.services.ai.azure.com/api/projects/my-project",
//!     "<access token>",
//! )
//! .agent_name("my-workflow");
//!
//! let harness = Harness::builder()
//!     .session_client(Arc::new(FoundryClient::new(config)?))
//!     .build()?;
//!
//! let result = harness.invoke_workflow("Summarize the launch plan").await?;
//! println!("{}", result.response_text());
//! # Ok(())
//! # }
//! ```

/// Stream folding into a `WorkflowResult`.
pub mod aggregate;
/// Public error types.
pub mod errors;
/// Harness entry point and builder.
pub mod harness;
/// Conversation and agent identifiers.
pub mod model;
/// Common imports for typical usage.
pub mod prelude;
/// Aggregated workflow result.
pub mod result;
/// Session client contract implemented by vendor integrations.
pub mod session;
/// Typed stream events.
pub mod stream;
/// Vendor-specific session clients.
pub mod vendors;

#[cfg(test)]
mod testing;

pub use aggregate::{WorkflowAccumulator, aggregate};
pub use errors::{HarnessError, SessionError};
pub use harness::{Harness, HarnessBuilder};
pub use model::{AgentInfo, ConversationHandle, ConversationId};
pub use result::{WorkflowResult, WorkflowStatus};
pub use session::AgentSessionClient;
pub use stream::{ActionField, EventStream, OutputItem, StreamEvent, WorkflowAction};
