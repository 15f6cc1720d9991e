use super::client::TextGenerator;
use super::outcome::AuditOutcome;
use super::parser::FeedbackParser;
use super::prompt::PromptBuilder;
use crate::error::AuditError;
use crate::scenario::Scenario;
use crate::transcript::TranscriptSnapshot;
use std::sync::Arc;
use tracing::{info, warn};

/// Prompt → generate → parse, classified into an `AuditOutcome`
#[derive(Clone)]
pub struct AuditPipeline {
    generator: Arc<dyn TextGenerator>,
}

impl AuditPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Run the whole audit for one transcript snapshot. Never panics and never
    /// returns an error: every failure ends up in `AuditOutcome::Failure`.
    pub async fn run(&self, scenario: &Scenario, transcript: &TranscriptSnapshot) -> AuditOutcome {
        let outcome: AuditOutcome = self.audit(scenario, transcript).await.into();

        match &outcome {
            AuditOutcome::Success(report) => info!(
                "Audit for scenario {} succeeded ({} ratings, sentiment: {})",
                scenario.id,
                report.ratings.len(),
                report.overall_sentiment
            ),
            AuditOutcome::Failure(e) => warn!("Audit for scenario {} failed: {}", scenario.id, e),
            _ => {}
        }

        outcome
    }

    async fn audit(
        &self,
        scenario: &Scenario,
        transcript: &TranscriptSnapshot,
    ) -> Result<super::FeedbackReport, AuditError> {
        let prompt = PromptBuilder::build(scenario, transcript)?;
        let raw = self.generator.submit(&prompt).await?;
        FeedbackParser::parse(&raw)
    }
}
