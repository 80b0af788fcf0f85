//! HTTP gateway over the workflow harness.
//!
//! Exposes `POST /api/workflow` and `GET /health`, plus the configuration and
//! logging setup shared with the one-shot CLI.

pub mod config;
pub mod error;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use error::{ApiError, ErrorEnvelope};
pub use server::{AppState, build_harness, build_router, serve};
