use serde::{Deserialize, Serialize};

/// Request published on `conversation.control.open`
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub agent_id: String,
    /// Chosen by the caller; the engine publishes events on
    /// `conversation.event.<session_id>`
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenSessionReply {
    #[serde(default)]
    pub error: Option<String>,
}

/// Request published on `conversation.control.close`
#[derive(Debug, Serialize, Deserialize)]
pub struct CloseSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CloseSessionReply {
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply on `conversation.control.permission`
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionReply {
    pub granted: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
