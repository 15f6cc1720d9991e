use super::turn::Turn;
use std::ops::Deref;
use std::sync::Arc;

/// Append-only ordered record of conversation turns.
///
/// Owned by the session controller; `clear` is only called when a new
/// session starts.
#[derive(Debug, Default, Clone)]
pub struct TranscriptLog {
    turns: Vec<Turn>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Immutable copy of the log as it is right now
    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            turns: Arc::from(self.turns.as_slice()),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Frozen view of a transcript, cheap to clone and safe to hand to
/// background tasks. Later appends to the log never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSnapshot {
    turns: Arc<[Turn]>,
}

impl TranscriptSnapshot {
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns: Arc::from(turns),
        }
    }
}

impl Deref for TranscriptSnapshot {
    type Target = [Turn];

    fn deref(&self) -> &[Turn] {
        &self.turns
    }
}
