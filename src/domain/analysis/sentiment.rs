//! Coarse sentiment of the latest buyer turn.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::patterns::SENTIMENT_PATTERNS;

/// Polarity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Lexicon classification: positive hits minus negative hits.
    pub fn classify(text: &str) -> Self {
        let positive = SENTIMENT_PATTERNS.count_matches(Sentiment::Positive, text) as i64;
        let negative = SENTIMENT_PATTERNS.count_matches(Sentiment::Negative, text) as i64;
        match positive - negative {
            d if d > 0 => Sentiment::Positive,
            d if d < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
