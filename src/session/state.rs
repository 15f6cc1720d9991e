use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a practice session.
///
/// `Idle` and `Disconnected` are both "not live"; only `Connected` accepts
/// new turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

impl SessionStatus {
    /// Connecting or connected: a new `start` must be rejected
    pub fn is_live(self) -> bool {
        matches!(self, SessionStatus::Connecting | SessionStatus::Connected)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Connecting => "Connecting",
            SessionStatus::Connected => "Connected",
            SessionStatus::Disconnected => "Disconnected",
        };
        f.write_str(label)
    }
}
