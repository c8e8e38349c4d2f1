//! Ranking and budget split across scored symbols.

use crate::analysis::round2;
use crate::domain::profile::RiskProfile;
use crate::domain::recommendation::{Recommendation, StockAnalysis};

/// Conservative blend weight on the score-proportional allocation; the rest goes to equal weight.
const CONSERVATIVE_SCORE_WEIGHT: f64 = 0.7;
const AGGRESSIVE_OVERWEIGHT: f64 = 1.2;

/// Ranks by score (stable, so ties keep input order), keeps the profile's top N and splits 100%
/// between them.
///
/// Allocations are rounded to two decimals after the profile adjustment and again after
/// renormalization, so the final sum may drift from 100 by up to 0.01 per recommendation.
pub fn allocate(mut analyses: Vec<StockAnalysis>, risk: RiskProfile) -> Vec<Recommendation> {
    analyses.sort_by(|a, b| b.score.total_cmp(&a.score));
    analyses.truncate(risk.recommendation_count());

    let n = analyses.len();
    if n == 0 {
        return Vec::new();
    }
    let equal_weight = 100.0 / n as f64;
    let total_score: f64 = analyses.iter().map(|a| a.score).sum();

    let adjusted: Vec<f64> = analyses
        .iter()
        .map(|a| {
            // All-zero scores have no relative signal; split evenly.
            let raw = if total_score > 0.0 {
                a.score / total_score * 100.0
            } else {
                equal_weight
            };
            let adjusted = match risk {
                RiskProfile::Conservative => {
                    CONSERVATIVE_SCORE_WEIGHT * raw + (1.0 - CONSERVATIVE_SCORE_WEIGHT) * equal_weight
                }
                RiskProfile::Aggressive => AGGRESSIVE_OVERWEIGHT * raw,
                RiskProfile::Moderate => raw,
            };
            round2(adjusted)
        })
        .collect();

    let total_adjusted: f64 = adjusted.iter().sum();

    analyses
        .into_iter()
        .zip(adjusted)
        .map(|(a, alloc)| Recommendation {
            confidence: score_to_confidence(a.score),
            allocation: if total_adjusted > 0.0 {
                round2(alloc / total_adjusted * 100.0)
            } else {
                round2(equal_weight)
            },
            symbol: a.symbol,
            rationale: a.rationale,
            target_price: a.target_price,
            last_close: a.last_close,
        })
        .collect()
}

/// Linear map of a 0..=100 score onto 0..=1.
pub fn score_to_confidence(score: f64) -> f64 {
    round2(score / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(symbol: &str, score: f64) -> StockAnalysis {
        StockAnalysis {
            symbol: symbol.to_string(),
            score,
            observations: Vec::new(),
            rationale: String::new(),
            target_price: 0.0,
            last_close: 0.0,
        }
    }

    fn sum(recs: &[Recommendation]) -> f64 {
        recs.iter().map(|r| r.allocation).sum()
    }

    #[test]
    fn conservative_equal_scores_stay_equal() {
        let recs = allocate(
            vec![analysis("A", 70.0), analysis("B", 70.0), analysis("C", 70.0)],
            RiskProfile::Conservative,
        );
        assert_eq!(recs.len(), 3);
        for r in &recs {
            assert_eq!(r.allocation, 33.33);
            assert_eq!(r.confidence, 0.7);
        }
        assert!((sum(&recs) - 100.0).abs() <= 0.01 * 3.0);
    }

    #[test]
    fn keeps_profile_count_and_ranks_descending() {
        let input: Vec<_> = (0..10)
            .map(|i| analysis(&format!("S{i}"), 40.0 + i as f64 * 5.0))
            .collect();

        for (risk, n) in [
            (RiskProfile::Conservative, 3),
            (RiskProfile::Moderate, 5),
            (RiskProfile::Aggressive, 7),
        ] {
            let recs = allocate(input.clone(), risk);
            assert_eq!(recs.len(), n);
            assert_eq!(recs[0].symbol, "S9");
            assert!(recs.windows(2).all(|w| w[0].allocation >= w[1].allocation));
            assert!((sum(&recs) - 100.0).abs() <= 0.01 * n as f64, "{risk}: {}", sum(&recs));
        }

        let few = allocate(input[..2].to_vec(), RiskProfile::Aggressive);
        assert_eq!(few.len(), 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let recs = allocate(
            vec![
                analysis("FIRST", 60.0),
                analysis("TOP", 90.0),
                analysis("SECOND", 60.0),
                analysis("THIRD", 60.0),
            ],
            RiskProfile::Conservative,
        );
        let symbols: Vec<_> = recs.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["TOP", "FIRST", "SECOND"]);
    }

    #[test]
    fn conservative_pulls_toward_equal_weight() {
        let input = vec![analysis("A", 90.0), analysis("B", 30.0)];
        let moderate = allocate(input.clone(), RiskProfile::Moderate);
        let conservative = allocate(input, RiskProfile::Conservative);
        assert_eq!(moderate[0].allocation, 75.0);
        // 0.7 * 75 + 0.3 * 50
        assert_eq!(conservative[0].allocation, 67.5);
        assert_eq!(conservative[1].allocation, 32.5);
    }

    #[test]
    fn aggressive_overshoot_is_undone_by_renormalization() {
        let input = vec![analysis("A", 80.0), analysis("B", 60.0), analysis("C", 20.0)];
        let moderate = allocate(input.clone(), RiskProfile::Moderate);
        let aggressive = allocate(input, RiskProfile::Aggressive);
        for (m, a) in moderate.iter().zip(&aggressive) {
            assert!((m.allocation - a.allocation).abs() <= 0.01);
        }
    }

    #[test]
    fn zero_scores_split_evenly() {
        let recs = allocate(vec![analysis("A", 0.0), analysis("B", 0.0)], RiskProfile::Moderate);
        assert_eq!(recs[0].allocation, 50.0);
        assert_eq!(recs[1].allocation, 50.0);
        assert_eq!(recs[0].confidence, 0.0);
    }

    #[test]
    fn empty_input_gives_empty_list() {
        assert!(allocate(Vec::new(), RiskProfile::Aggressive).is_empty());
    }
}
