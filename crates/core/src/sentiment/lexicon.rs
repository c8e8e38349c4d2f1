//! Weighted financial word lists and the key-term vocabulary.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("up", 0.5),
    ("gain", 0.7),
    ("profit", 0.8),
    ("growth", 0.6),
    ("positive", 0.7),
    ("increase", 0.6),
    ("higher", 0.5),
    ("beat", 0.8),
    ("strong", 0.6),
    ("outperform", 0.8),
    ("exceed", 0.7),
    ("above", 0.5),
    ("record", 0.7),
    ("bullish", 0.9),
    ("confident", 0.6),
    ("opportunity", 0.5),
    ("recovery", 0.6),
    ("momentum", 0.5),
    ("advantage", 0.5),
    ("successful", 0.6),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("down", 0.5),
    ("loss", 0.7),
    ("decline", 0.6),
    ("negative", 0.7),
    ("decrease", 0.6),
    ("lower", 0.5),
    ("miss", 0.8),
    ("weak", 0.6),
    ("underperform", 0.8),
    ("below", 0.5),
    ("disappoint", 0.7),
    ("concern", 0.6),
    ("bearish", 0.9),
    ("warning", 0.7),
    ("risk", 0.5),
    ("challenge", 0.5),
    ("struggle", 0.6),
    ("slowdown", 0.6),
    ("pressure", 0.5),
    ("fail", 0.8),
];

/// Scanned in this order; the order of matches is the order reported.
const FINANCIAL_TERMS: &[&str] = &[
    "earnings",
    "revenue",
    "profit",
    "loss",
    "dividend",
    "growth",
    "forecast",
    "guidance",
    "outlook",
    "downgrade",
    "upgrade",
    "acquisition",
    "merger",
    "partnership",
    "investment",
    "expansion",
    "restructuring",
    "layoffs",
    "CEO",
    "executive",
    "strategy",
    "regulation",
    "Fed",
    "interest rates",
    "inflation",
    "recession",
    "bull market",
    "bear market",
    "volatility",
    "rally",
    "correction",
];

static DEFAULT_LEXICON: Lazy<SentimentLexicon> = Lazy::new(|| {
    SentimentLexicon::new(POSITIVE_WORDS, NEGATIVE_WORDS, FINANCIAL_TERMS)
        .expect("built-in lexicon compiles")
});

/// Immutable once built. Share it by reference.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: HashMap<String, f64>,
    negative: HashMap<String, f64>,
    terms: Vec<KeyTerm>,
}

#[derive(Debug, Clone)]
struct KeyTerm {
    term: String,
    pattern: Regex,
}

impl SentimentLexicon {
    /// Word keys are stored lower-cased. Terms keep their spelling for display and match as
    /// whole words, case-insensitively.
    pub fn new(positive: &[(&str, f64)], negative: &[(&str, f64)], terms: &[&str]) -> anyhow::Result<Self> {
        let weights = |words: &[(&str, f64)]| -> HashMap<String, f64> {
            words.iter().map(|(w, v)| (w.to_lowercase(), *v)).collect()
        };

        let terms = terms
            .iter()
            .map(|term| {
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&term.to_lowercase())))
                    .with_context(|| format!("invalid key term pattern for {term:?}"))?;
                Ok(KeyTerm {
                    term: term.to_string(),
                    pattern,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            positive: weights(positive),
            negative: weights(negative),
            terms,
        })
    }

    /// The built-in financial lexicon, compiled on first use.
    pub fn global() -> &'static SentimentLexicon {
        &DEFAULT_LEXICON
    }

    pub fn positive_weight(&self, token: &str) -> Option<f64> {
        self.positive.get(token).copied()
    }

    pub fn negative_weight(&self, token: &str) -> Option<f64> {
        self.negative.get(token).copied()
    }

    /// Terms present in `lowered_text`, in vocabulary order.
    pub fn matching_terms<'a>(&'a self, lowered_text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.terms
            .iter()
            .filter(move |t| t.pattern.is_match(lowered_text))
            .map(|t| t.term.as_str())
    }
}
