use crate::analysis::round2;
use crate::domain::sentiment::{SentimentLabel, SentimentResult};
use crate::sentiment::lexicon::SentimentLexicon;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_KEY_TERMS: usize = 5;
const CONFIDENCE_FLOOR: f64 = 0.5;
const CONFIDENCE_CEILING: f64 = 0.95;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern compiles"));

/// Stateless lexicon scorer. Cheap to copy; holds only a reference to its lexicon.
#[derive(Debug, Clone, Copy)]
pub struct SentimentScorer<'a> {
    lexicon: &'a SentimentLexicon,
}

impl Default for SentimentScorer<'static> {
    fn default() -> Self {
        Self::new(SentimentLexicon::global())
    }
}

impl<'a> SentimentScorer<'a> {
    pub fn new(lexicon: &'a SentimentLexicon) -> Self {
        Self { lexicon }
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        let lowered = text.to_lowercase();

        let mut positive = 0.0;
        let mut negative = 0.0;
        for token in WORD.find_iter(&lowered).map(|m| m.as_str()) {
            positive += self.lexicon.positive_weight(token).unwrap_or(0.0);
            negative += self.lexicon.negative_weight(token).unwrap_or(0.0);
        }

        let total = positive + negative;
        let score = if total > 0.0 {
            (positive - negative) / total
        } else {
            0.0
        };

        let key_terms = self
            .lexicon
            .matching_terms(&lowered)
            .take(MAX_KEY_TERMS)
            .map(str::to_string)
            .collect();

        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
            key_terms,
            confidence: round2((CONFIDENCE_FLOOR + 0.5 * score.abs()).min(CONFIDENCE_CEILING)),
        }
    }
}
