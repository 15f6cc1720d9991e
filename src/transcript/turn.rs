use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who said something during a practice conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The person practicing
    Trainee,
    /// The simulated party played by the conversational engine
    Counterpart,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Trainee => f.write_str("Trainee"),
            Speaker::Counterpart => f.write_str("Counterpart"),
        }
    }
}

/// A single utterance in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke
    pub speaker: Speaker,

    /// What was said
    pub text: String,

    /// When the turn was recorded (informational, never used for ordering)
    pub occurred_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time
    pub fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Wall-clock time of the turn as `HH:MM:SS`
    pub fn formatted_time(&self) -> String {
        self.occurred_at.format("%H:%M:%S").to_string()
    }
}

/// Renders on a single line; line breaks inside the text become spaces
impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.speaker, self.formatted_time())?;

        for (i, line) in self.text.lines().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
