use crate::error::AuditError;
use crate::scenario::Scenario;
use crate::transcript::Turn;

/// Instructions used when a scenario ships without its own rating rubric
pub const FALLBACK_RATING_PROMPT: &str = "\
You are an AI Quality Analyst reviewing a practice conversation. \
No scenario-specific rating rubric was provided, so give general feedback on the \
trainee's performance and mention in the summary that the rubric was missing.

For each competency you assess, assign a rating from 1 to 5 stars (5 is best) and a brief explanation.

Format your response as a JSON object with the following structure:
{
\"summary\": \"A concise summary of the conversation.\",
\"ratings\": {
    \"general_performance\": { \"stars\": N, \"explanation\": \"...\" }
},
\"overall_sentiment\": \"e.g., Positive, Neutral, Negative\",
\"areas_for_improvement\": [\"Suggestion 1\", \"Suggestion 2\"]
}

Conversation Transcript:";

/// Renders the submission sent to the text-generation endpoint
pub struct PromptBuilder;

impl PromptBuilder {
    /// Rubric followed by one `"<speaker> (<time>): <text>"` line per turn.
    ///
    /// An empty transcript is rejected with `EmptyTranscript` so that a blank
    /// submission never reaches the endpoint.
    pub fn build(scenario: &Scenario, transcript: &[Turn]) -> Result<String, AuditError> {
        if transcript.is_empty() {
            return Err(AuditError::EmptyTranscript);
        }

        let template = scenario
            .rating_prompt_template
            .as_deref()
            .filter(|template| !template.trim().is_empty())
            .unwrap_or(FALLBACK_RATING_PROMPT);

        let lines: Vec<String> = transcript.iter().map(Turn::to_string).collect();

        Ok(format!("{}\n\n{}\n", template.trim_end(), lines.join("\n")))
    }
}
