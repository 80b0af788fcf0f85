//! Azure AI Foundry project integration.
//!
//! Talks to the project's OpenAI-compatible conversations and responses
//! endpoints and streams responses as Server-Sent Events.
mod adapter;
mod config;
pub(crate) mod transport;

pub use adapter::FoundryClient;
pub use config::{DEFAULT_AGENT_NAME, DEFAULT_API_VERSION, FoundryClientConfig};
