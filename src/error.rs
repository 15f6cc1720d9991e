use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the session lifecycle (starting, stopping, engine events).
///
/// These never end up in an `AuditOutcome`; they block the action that caused
/// them and are reported to the caller directly.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SessionError {
    #[error("no scenario selected")]
    MissingScenario,

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("a session is already connecting or connected")]
    AlreadyActive,

    #[error("no live session")]
    NotConnected,

    #[error("capture permission denied: {0}")]
    PermissionDenied(String),

    #[error("engine failed to start session: {0}")]
    EngineStartFailure(String),

    #[error("engine failed to stop session: {0}")]
    EngineStopFailure(String),

    #[error("engine reported an error: {0}")]
    EngineError(String),
}

/// Classified failure of the audit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditError {
    #[error("transcript is empty, nothing to audit")]
    EmptyTranscript,

    #[error("network failure: {detail}")]
    NetworkFailure { detail: String },

    #[error("generation endpoint returned {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("could not parse feedback: {detail}")]
    ParseFailure { detail: String, raw: String },

    #[error("feedback does not match the report shape: {reason}")]
    SchemaMismatch { reason: String, raw: String },
}

impl AuditError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkFailure {
            detail: detail.into(),
        }
    }

    pub fn schema(reason: impl Into<String>, raw: &str) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}
