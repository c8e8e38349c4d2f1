use crate::domain::profile::{RiskProfile, TimeHorizon};
use crate::domain::recommendation::SkippedSymbol;
use crate::domain::sentiment::SentimentLabel;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SENTIMENT_DATE_RANGE: u32 = 7;
const MAX_SENTIMENT_DATE_RANGE: u32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub risk_tolerance: RiskProfile,
    pub budget: f64,
    pub time_horizon: TimeHorizon,
    #[serde(default)]
    pub sector_preferences: Option<Vec<String>>,
    #[serde(default)]
    pub exclusions: Option<Vec<String>>,
}

impl UserProfile {
    pub fn validate_and_normalize(self) -> anyhow::Result<Self> {
        ensure!(
            self.budget.is_finite() && self.budget >= 0.0,
            "budget must be a non-negative number (got {})",
            self.budget
        );

        Ok(Self {
            sector_preferences: self.sector_preferences.map(|v| normalize_list(v, false)),
            exclusions: self.exclusions.map(|v| normalize_list(v, true)),
            ..self
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub symbols: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub date_range: Option<u32>,
}

impl SentimentRequest {
    pub fn validate_and_normalize(self) -> anyhow::Result<Self> {
        let date_range = self.date_range.unwrap_or(DEFAULT_SENTIMENT_DATE_RANGE);
        ensure!(
            (1..=MAX_SENTIMENT_DATE_RANGE).contains(&date_range),
            "date_range must be 1..={MAX_SENTIMENT_DATE_RANGE} days (got {date_range})"
        );

        Ok(Self {
            text: self.text.filter(|t| !t.is_empty()),
            symbols: self.symbols.map(|v| normalize_list(v, false)),
            sources: self.sources.map(|v| normalize_list(v, false)),
            date_range: Some(date_range),
        })
    }

    pub fn date_range(&self) -> u32 {
        self.date_range.unwrap_or(DEFAULT_SENTIMENT_DATE_RANGE)
    }
}

fn normalize_list(items: Vec<String>, uppercase: bool) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| if uppercase { s.to_ascii_uppercase() } else { s })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecommendation {
    pub symbol: String,
    pub name: String,
    pub confidence_score: f64,
    pub price: f64,
    pub target_price: Option<f64>,
    pub rationale: String,
    /// Percentage of the budget.
    pub suggested_allocation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<StockRecommendation>,
    #[serde(default)]
    pub skipped: Vec<SkippedSymbol>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub text: Option<String>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub key_terms: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub analysis: Vec<SentimentAnalysis>,
    pub overall_sentiment: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_profile_parses_and_normalizes() {
        let v = json!({
            "risk_tolerance": "aggressive",
            "budget": 10000.0,
            "time_horizon": "short",
            "exclusions": [" tsla ", ""],
        });
        let profile: UserProfile = serde_json::from_value(v).unwrap();
        let profile = profile.validate_and_normalize().unwrap();
        assert_eq!(profile.risk_tolerance, RiskProfile::Aggressive);
        assert_eq!(profile.time_horizon, TimeHorizon::Short);
        assert_eq!(profile.exclusions, Some(vec!["TSLA".to_string()]));
        assert!(profile.sector_preferences.is_none());
    }

    #[test]
    fn user_profile_rejects_negative_budget() {
        let profile = UserProfile {
            risk_tolerance: RiskProfile::Moderate,
            budget: -1.0,
            time_horizon: TimeHorizon::Long,
            sector_preferences: None,
            exclusions: None,
        };
        assert!(profile.validate_and_normalize().is_err());
    }

    #[test]
    fn sentiment_request_defaults_date_range() {
        let req: SentimentRequest = serde_json::from_value(json!({"text": "hello"})).unwrap();
        let req = req.validate_and_normalize().unwrap();
        assert_eq!(req.date_range(), DEFAULT_SENTIMENT_DATE_RANGE);

        let bad = SentimentRequest {
            date_range: Some(0),
            ..Default::default()
        };
        assert!(bad.validate_and_normalize().is_err());
    }

    #[test]
    fn sentiment_request_keeps_symbol_case_and_whitespace_text() {
        let req = SentimentRequest {
            text: Some("   ".to_string()),
            symbols: Some(vec![" aapl ".to_string(), "Tsla".to_string(), " ".to_string()]),
            ..Default::default()
        }
        .validate_and_normalize()
        .unwrap();
        assert_eq!(req.text.as_deref(), Some("   "));
        assert_eq!(req.symbols, Some(vec!["aapl".to_string(), "Tsla".to_string()]));

        let empty = SentimentRequest {
            text: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate_and_normalize().unwrap().text.is_none());
    }
}
