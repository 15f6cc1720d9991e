//! Transcript audit pipeline
//!
//! Once a session ends, its transcript snapshot flows through:
//! - `PromptBuilder`: scenario rubric + rendered transcript → prompt text
//! - `TextGenerator` / `AuditClient`: one call to the text-generation endpoint
//! - `FeedbackParser`: raw generated text → validated `FeedbackReport`
//!
//! The result is surfaced as an `AuditOutcome`.

mod client;
mod outcome;
mod parser;
mod pipeline;
mod prompt;
mod report;

pub use client::{AuditClient, GenerateRequest, GenerateResponse, TextGenerator};
pub use outcome::AuditOutcome;
pub use parser::FeedbackParser;
pub use pipeline::AuditPipeline;
pub use prompt::{PromptBuilder, FALLBACK_RATING_PROMPT};
pub use report::{format_indicator_name, render_stars, FeedbackReport, Rating};
