use crate::error::SessionError;
use crate::transcript::Speaker;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Event emitted by the conversational engine for an open session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Connected,
    Disconnected,
    Message { speaker: Speaker, text: String },
    Error { detail: String },
}

/// Engine-side identifier of an open session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub String);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opened engine session: its handle and the ordered event stream
#[derive(Debug)]
pub struct EngineSession {
    pub handle: SessionHandle,
    pub events: mpsc::Receiver<EngineEvent>,
}

/// Conversational engine backend
///
/// Implementations:
/// - `NatsEngine`: request/reply control and event streaming over NATS
#[async_trait::async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Open a live session with the given agent.
    ///
    /// Events must be delivered on the returned channel in the order the
    /// engine produced them. Fails with `PermissionDenied` or
    /// `EngineStartFailure`.
    async fn open_session(&self, agent_id: &str) -> Result<EngineSession, SessionError>;

    /// Close a session. Fails with `EngineStopFailure`.
    async fn close_session(&self, handle: &SessionHandle) -> Result<(), SessionError>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Access to the audio-capture permission of the environment
#[async_trait::async_trait]
pub trait CapturePermission: Send + Sync {
    /// Ask for capture access; a refusal is `PermissionDenied`
    async fn request(&self) -> Result<(), SessionError>;
}
