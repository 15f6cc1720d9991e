use super::report::FeedbackReport;
use crate::error::AuditError;
use serde::Serialize;

/// State of the audit for the current session.
///
/// Exactly one outcome is live at a time: a new session resets it to `Idle`,
/// an audit moves it to `Loading`, and the pipeline settles it into
/// `Success` or `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum AuditOutcome {
    #[default]
    Idle,
    Loading,
    Success(FeedbackReport),
    Failure(AuditError),
}

impl AuditOutcome {
    /// `Success` or `Failure`
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuditOutcome::Success(_) | AuditOutcome::Failure(_))
    }

    pub fn report(&self) -> Option<&FeedbackReport> {
        match self {
            AuditOutcome::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AuditError> {
        match self {
            AuditOutcome::Failure(error) => Some(error),
            _ => None,
        }
    }
}

impl From<Result<FeedbackReport, AuditError>> for AuditOutcome {
    fn from(result: Result<FeedbackReport, AuditError>) -> Self {
        match result {
            Ok(report) => AuditOutcome::Success(report),
            Err(error) => AuditOutcome::Failure(error),
        }
    }
}
