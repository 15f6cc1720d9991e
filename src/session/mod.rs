//! Practice session management
//!
//! This module provides the `SessionController` that:
//! - Owns the session lifecycle (`Idle → Connecting → Connected → Disconnected`)
//! - Records engine messages into the transcript, in arrival order
//! - Triggers exactly one audit per session when the conversation ends
//! - Discards audit results that arrive after a newer session has started

mod controller;
mod state;
mod stats;

pub use controller::SessionController;
pub use state::SessionStatus;
pub use stats::SessionStats;
