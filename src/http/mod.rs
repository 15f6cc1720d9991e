//! HTTP control API
//!
//! This module provides a REST API for driving practice sessions:
//! - GET /scenarios - List available scenarios
//! - POST /session/start - Start a session for a scenario
//! - POST /session/stop - Stop the session and audit its transcript
//! - GET /session/status - Query session status
//! - GET /session/transcript - Get the transcript so far
//! - GET /session/feedback - Get the audit outcome
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
