use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Star rating and justification for one competency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// 1 to 5 stars
    pub stars: u8,
    pub explanation: String,
}

/// Structured performance audit of one practice conversation
///
/// Serializes to the same JSON shape the generation service is asked to
/// produce, so a report can be fed back through `FeedbackParser::parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub summary: String,

    /// Indicator key (scenario-defined) → rating
    pub ratings: BTreeMap<String, Rating>,

    pub overall_sentiment: String,

    pub areas_for_improvement: Vec<String>,
}

/// `ask_right_questions` → `Ask Right Questions`
pub fn format_indicator_name(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One star glyph per star, clamped to 0..=5
pub fn render_stars(count: i64) -> String {
    "⭐".repeat(count.clamp(0, 5) as usize)
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary: {}", self.summary)?;
        writeln!(f)?;
        writeln!(f, "Ratings:")?;
        for (key, rating) in &self.ratings {
            writeln!(f, "  {}:", format_indicator_name(key))?;
            writeln!(f, "    Stars: {}", render_stars(rating.stars.into()))?;
            writeln!(f, "    Explanation: {}", rating.explanation)?;
        }
        writeln!(f)?;
        writeln!(f, "Overall Sentiment: {}", self.overall_sentiment)?;

        if !self.areas_for_improvement.is_empty() {
            writeln!(f)?;
            writeln!(f, "Areas for Improvement:")?;
            for area in &self.areas_for_improvement {
                writeln!(f, "  • {}", area)?;
            }
        }

        Ok(())
    }
}
