use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Strictly beyond +/-0.2; the boundaries themselves are neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 0.2 {
            Self::Positive
        } else if score < -0.2 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// -1..=1, unrounded.
    pub score: f64,
    pub label: SentimentLabel,
    pub key_terms: Vec<String>,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_boundaries_are_neutral() {
        assert_eq!(SentimentLabel::from_score(0.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.21), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.21), SentimentLabel::Negative);
    }
}
