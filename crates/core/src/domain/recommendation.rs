use serde::{Deserialize, Serialize};

/// Per-symbol scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    /// 0..=100, two decimals.
    pub score: f64,
    /// Every observation that fired, in rule order.
    pub observations: Vec<String>,
    /// First three observations joined with " and ".
    pub rationale: String,
    pub target_price: f64,
    pub last_close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub confidence: f64,
    pub rationale: String,
    /// Percentage of the budget, 0..=100.
    pub allocation: f64,
    pub target_price: f64,
    pub last_close: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Ranked recommendations plus the symbols that could not be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
    pub skipped: Vec<SkippedSymbol>,
}

impl RecommendationSet {
    pub fn total_allocation(&self) -> f64 {
        self.recommendations.iter().map(|r| r.allocation).sum()
    }
}
