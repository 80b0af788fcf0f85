/// Azure AI Foundry project client.
pub mod foundry;
