pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod nats;
pub mod scenario;
pub mod session;
pub mod transcript;

pub use audit::{
    AuditClient, AuditOutcome, AuditPipeline, FeedbackParser, FeedbackReport, PromptBuilder,
    Rating, TextGenerator,
};
pub use config::Config;
pub use engine::{CapturePermission, ConversationEngine, EngineEvent, EngineSession, SessionHandle};
pub use error::{AuditError, SessionError};
pub use http::{create_router, AppState};
pub use nats::NatsEngine;
pub use scenario::{Scenario, ScenarioCatalog};
pub use session::{SessionController, SessionStats, SessionStatus};
pub use transcript::{Speaker, TranscriptCache, TranscriptLog, TranscriptSnapshot, Turn};
