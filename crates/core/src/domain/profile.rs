use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared willingness to accept volatility.
///
/// Unknown strings fall back to [`RiskProfile::Moderate`]; this differs from [`TimeHorizon`],
/// which keeps the unrecognized value and skips its rule instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conservative" => Self::Conservative,
            "moderate" => Self::Moderate,
            "aggressive" => Self::Aggressive,
            other => {
                tracing::warn!(risk_tolerance = %other, "unknown risk tolerance; using moderate");
                Self::Moderate
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// How many ranked symbols make it into the recommendation list.
    pub fn recommendation_count(&self) -> usize {
        match self {
            Self::Conservative => 3,
            Self::Moderate => 5,
            Self::Aggressive => 7,
        }
    }

    pub fn target_multiplier(&self) -> f64 {
        match self {
            Self::Conservative => 1.05,
            Self::Moderate => 1.10,
            Self::Aggressive => 1.20,
        }
    }
}

impl From<String> for RiskProfile {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intended holding period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
    /// Kept verbatim. The horizon bonus simply does not apply.
    Unrecognized(String),
}

impl TimeHorizon {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "medium" => Self::Medium,
            "long" => Self::Long,
            _ => {
                tracing::warn!(time_horizon = %raw, "unrecognized time horizon; horizon rule skipped");
                Self::Unrecognized(raw.to_string())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for TimeHorizon {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TimeHorizon> for String {
    fn from(h: TimeHorizon) -> Self {
        h.as_str().to_string()
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_risk_falls_back_to_moderate() {
        assert_eq!(RiskProfile::parse("yolo"), RiskProfile::Moderate);
        assert_eq!(RiskProfile::parse(" Aggressive "), RiskProfile::Aggressive);
        let parsed: RiskProfile = serde_json::from_str("\"something\"").unwrap();
        assert_eq!(parsed, RiskProfile::Moderate);
    }

    #[test]
    fn unknown_horizon_is_kept_not_defaulted() {
        assert_eq!(
            TimeHorizon::parse("decade"),
            TimeHorizon::Unrecognized("decade".to_string())
        );
        let parsed: TimeHorizon = serde_json::from_str("\"long\"").unwrap();
        assert_eq!(parsed, TimeHorizon::Long);
        assert_eq!(serde_json::to_string(&TimeHorizon::Short).unwrap(), "\"short\"");
    }

    #[test]
    fn profile_counts_and_multipliers() {
        assert_eq!(RiskProfile::Conservative.recommendation_count(), 3);
        assert_eq!(RiskProfile::Moderate.recommendation_count(), 5);
        assert_eq!(RiskProfile::Aggressive.recommendation_count(), 7);
        assert_eq!(RiskProfile::Aggressive.target_multiplier(), 1.20);
    }
}
