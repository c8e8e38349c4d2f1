//! Additive rule chain turning indicators, volatility and trend into a 0..=100 score.

use crate::analysis::error::ScoringError;
use crate::analysis::indicators::{IndicatorRow, IndicatorSet};
use crate::analysis::round2;
use crate::analysis::trend::TrendStrength;
use crate::domain::price::PriceSeries;
use crate::domain::profile::{RiskProfile, TimeHorizon};
use crate::domain::recommendation::StockAnalysis;

const BASE_SCORE: f64 = 50.0;
const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const RATIONALE_LINES: usize = 3;

pub fn analyze_stock(
    symbol: &str,
    series: &PriceSeries,
    risk: RiskProfile,
    horizon: &TimeHorizon,
) -> Result<StockAnalysis, ScoringError> {
    let insufficient = || ScoringError::InsufficientData {
        symbol: symbol.to_string(),
    };
    if series.is_empty() {
        return Err(insufficient());
    }
    let indicators = IndicatorSet::compute(series).map_err(|err| ScoringError::IndicatorFailed {
        symbol: symbol.to_string(),
        reason: format!("{err:#}"),
    })?;
    let current = indicators.latest().copied().ok_or_else(insufficient)?;

    let mut card = ScoreCard::new();
    card.moving_average_rules(&current);
    card.rsi_rule(current.rsi, risk);
    card.volatility_rule(annualized_volatility(series), risk);
    card.horizon_rule(TrendStrength::compute(series), horizon);

    let score = round2(card.score.clamp(0.0, 100.0));
    let rationale = card
        .observations
        .iter()
        .take(RATIONALE_LINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" and ");
    let target_price = round2(current.close * risk.target_multiplier());

    tracing::debug!(
        symbol,
        score,
        risk = %risk,
        horizon = %horizon,
        observations = card.observations.len(),
        "scored symbol"
    );

    Ok(StockAnalysis {
        symbol: symbol.to_string(),
        score,
        observations: card.observations,
        rationale,
        target_price,
        last_close: current.close,
    })
}

/// Standard deviation (sample) of daily percentage returns scaled by sqrt(252).
///
/// `None` with fewer than two usable returns. Returns off a zero close are skipped.
pub fn annualized_volatility(series: &PriceSeries) -> Option<f64> {
    let returns: Vec<f64> = series
        .points()
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .filter(|r| r.is_finite())
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

struct ScoreCard {
    score: f64,
    observations: Vec<String>,
}

impl ScoreCard {
    fn new() -> Self {
        Self {
            score: BASE_SCORE,
            observations: Vec::new(),
        }
    }

    fn add(&mut self, delta: f64, observation: &str) {
        self.score += delta;
        self.observations.push(observation.to_string());
    }

    // An undefined MA means neither branch fires.
    fn moving_average_rules(&mut self, current: &IndicatorRow) {
        if let Some(ma_20) = current.ma_20 {
            if current.close > ma_20 {
                self.add(10.0, "Price above 20-day MA");
            } else {
                self.add(-5.0, "Price below 20-day MA");
            }
        }

        if let (Some(ma_5), Some(ma_20)) = (current.ma_5, current.ma_20) {
            if ma_5 > ma_20 {
                self.add(15.0, "5-day MA crossed above 20-day MA");
            }
        }
    }

    fn rsi_rule(&mut self, rsi: Option<f64>, risk: RiskProfile) {
        let Some(rsi) = rsi else { return };
        match risk {
            RiskProfile::Conservative => {
                if (40.0..=60.0).contains(&rsi) {
                    self.add(15.0, "RSI indicates stable momentum");
                } else if rsi > 70.0 {
                    self.add(-20.0, "RSI indicates potential overbought conditions");
                }
            }
            RiskProfile::Aggressive => {
                if rsi >= 60.0 {
                    self.add(20.0, "RSI shows strong momentum");
                }
            }
            RiskProfile::Moderate => {}
        }
    }

    fn volatility_rule(&mut self, volatility: Option<f64>, risk: RiskProfile) {
        let Some(vol) = volatility else { return };
        match risk {
            RiskProfile::Conservative => {
                if vol < 0.20 {
                    self.add(15.0, "Low volatility suitable for conservative profile");
                } else {
                    self.add(-15.0, "Higher volatility than ideal for conservative profile");
                }
            }
            RiskProfile::Moderate => {
                if (0.20..=0.30).contains(&vol) {
                    self.add(10.0, "Moderate volatility suitable for balanced profile");
                }
            }
            RiskProfile::Aggressive => {
                if vol > 0.30 {
                    self.add(10.0, "Higher volatility with potential for greater returns");
                }
            }
        }
    }

    fn horizon_rule(&mut self, trend: TrendStrength, horizon: &TimeHorizon) {
        match horizon {
            TimeHorizon::Short => {
                if trend.short_term > 0.7 {
                    self.add(15.0, "Strong short-term uptrend");
                }
            }
            TimeHorizon::Medium => {
                if (trend.short_term + trend.medium_term) / 2.0 > 0.6 {
                    self.add(15.0, "Consistent medium-term uptrend");
                }
            }
            TimeHorizon::Long => {
                if trend.medium_term > 0.6 {
                    self.add(10.0, "Solid long-term growth potential");
                }
            }
            TimeHorizon::Unrecognized(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), closes)
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.01f64.powi(i as i32)).collect()
    }

    #[test]
    fn empty_series_is_insufficient_data() {
        let err = analyze_stock("AAPL", &PriceSeries::default(), RiskProfile::Moderate, &TimeHorizon::Long)
            .unwrap_err();
        assert_eq!(
            err,
            ScoringError::InsufficientData {
                symbol: "AAPL".to_string()
            }
        );
    }

    #[test]
    fn steady_riser_for_aggressive_short_horizon() {
        // Constant 1% daily return: zero volatility, RSI 100, strong short trend.
        let a = analyze_stock("NVDA", &series(&rising(30)), RiskProfile::Aggressive, &TimeHorizon::Short)
            .unwrap();
        // 50 + 10 (above MA20) + 15 (MA5 > MA20) + 20 (RSI) + 15 (short trend 0.8)
        assert_eq!(a.score, 100.0);
        assert_eq!(
            a.rationale,
            "Price above 20-day MA and 5-day MA crossed above 20-day MA and RSI shows strong momentum"
        );
        assert_eq!(a.observations.len(), 4);
        let last = *rising(30).last().unwrap();
        assert_eq!(a.target_price, round2(last * 1.20));
    }

    #[test]
    fn conservative_penalises_overbought_riser() {
        let a = analyze_stock("KO", &series(&rising(30)), RiskProfile::Conservative, &TimeHorizon::Long)
            .unwrap();
        // 50 + 10 + 15 - 20 (RSI > 70) + 15 (vol 0) + 10 (medium trend 0.95)
        assert_eq!(a.score, 80.0);
        assert!(a.observations.contains(&"Low volatility suitable for conservative profile".to_string()));
    }

    #[test]
    fn flat_series_scores_without_panicking() {
        let a = analyze_stock("FLAT", &series(&[20.0; 25]), RiskProfile::Moderate, &TimeHorizon::Medium)
            .unwrap();
        // close == MA20 so "below" fires, nothing else does.
        assert_eq!(a.score, 45.0);
        assert_eq!(a.rationale, "Price below 20-day MA");
        assert_eq!(a.target_price, 22.0);
    }

    #[test]
    fn short_series_skips_undefined_rules() {
        let a = analyze_stock("NEW", &series(&[10.0]), RiskProfile::Conservative, &TimeHorizon::Short)
            .unwrap();
        assert_eq!(a.score, 50.0);
        assert_eq!(a.rationale, "");
        assert_eq!(a.target_price, 10.5);
    }

    #[test]
    fn unrecognized_horizon_adds_nothing() {
        let s = series(&rising(30));
        let known = analyze_stock("X", &s, RiskProfile::Moderate, &TimeHorizon::Long).unwrap();
        let unknown = analyze_stock(
            "X",
            &s,
            RiskProfile::Moderate,
            &TimeHorizon::Unrecognized("someday".to_string()),
        )
        .unwrap();
        assert_eq!(known.score - unknown.score, 10.0);
    }

    #[test]
    fn volatility_of_alternating_returns() {
        let s = series(&[100.0, 110.0, 99.0, 108.9]);
        let vol = annualized_volatility(&s).unwrap();
        let returns = [0.1, -0.1, 0.1];
        let mean = returns.iter().sum::<f64>() / 3.0;
        let var = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / 2.0;
        assert!((vol - var.sqrt() * 252f64.sqrt()).abs() < 1e-9);
        assert!(annualized_volatility(&series(&[1.0, 2.0])).is_none());
    }

    #[test]
    fn choppy_decline_is_penalised_for_conservative() {
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 - i as f64 * 2.0 + if i % 2 == 0 { 3.0 } else { -3.0 })
            .collect();
        let a = analyze_stock("DOWN", &series(&closes), RiskProfile::Conservative, &TimeHorizon::Short)
            .unwrap();
        // 50 - 5 (below MA20) - 15 (volatile); RSI sits near 33 so no RSI rule.
        assert_eq!(a.score, 30.0);
        assert_eq!(
            a.rationale,
            "Price below 20-day MA and Higher volatility than ideal for conservative profile"
        );
    }
}
