//! Conversation transcript
//!
//! This module provides:
//! - `Turn`: one utterance by either party, with speaker and timestamp
//! - `TranscriptLog`: the append-only, ordered record of a session's turns
//! - `TranscriptSnapshot`: an immutable copy handed to the audit pipeline
//! - `TranscriptCache`: best-effort mirror of the log on local disk

mod cache;
mod log;
mod turn;

pub use cache::TranscriptCache;
pub use log::{TranscriptLog, TranscriptSnapshot};
pub use turn::{Speaker, Turn};
