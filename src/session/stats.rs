use super::state::SessionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statistics about the current (or last) practice session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Lifecycle state
    pub status: SessionStatus,

    /// Controller-side session identifier, once a session has been started
    pub session_id: Option<Uuid>,

    /// Scenario the session is bound to
    pub scenario_id: Option<String>,

    /// When the session started
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds from start until termination (or until now while live)
    pub duration_secs: f64,

    /// Number of turns in the transcript
    pub turn_count: usize,
}
