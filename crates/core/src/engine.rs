//! Entry points for the two scoring pipelines.
//!
//! Per-symbol scoring has no cross-symbol dependency. The concurrent variants fan out on tokio's
//! blocking pool and join before the single-threaded ranking step, so both variants return the
//! same result for the same input.

use crate::analysis::allocation::allocate;
use crate::analysis::error::ScoringError;
use crate::analysis::scorer::analyze_stock;
use crate::domain::price::SymbolHistory;
use crate::domain::profile::{RiskProfile, TimeHorizon};
use crate::domain::recommendation::{RecommendationSet, SkippedSymbol, StockAnalysis};
use crate::domain::sentiment::SentimentResult;
use crate::sentiment::SentimentScorer;
use tokio::task::JoinSet;

/// Scores every history, then ranks and allocates. `budget` is carried for the caller's display
/// and does not influence the result.
pub fn score_recommendations(
    histories: &[SymbolHistory],
    risk: RiskProfile,
    horizon: &TimeHorizon,
    budget: f64,
) -> RecommendationSet {
    tracing::info!(symbols = histories.len(), %risk, %horizon, budget, "scoring recommendations");

    let outcomes = histories
        .iter()
        .map(|h| analyze_stock(&h.symbol, &h.series, risk, horizon))
        .collect();
    rank(outcomes, risk)
}

pub async fn score_recommendations_concurrent(
    histories: Vec<SymbolHistory>,
    risk: RiskProfile,
    horizon: TimeHorizon,
    budget: f64,
) -> RecommendationSet {
    tracing::info!(symbols = histories.len(), %risk, %horizon, budget, "scoring recommendations concurrently");

    let symbols: Vec<String> = histories.iter().map(|h| h.symbol.clone()).collect();
    let mut tasks = JoinSet::new();
    for (idx, history) in histories.into_iter().enumerate() {
        let horizon = horizon.clone();
        tasks.spawn_blocking(move || {
            (idx, analyze_stock(&history.symbol, &history.series, risk, &horizon))
        });
    }

    let mut slots: Vec<Option<Result<StockAnalysis, ScoringError>>> = vec![None; symbols.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, outcome)) => slots[idx] = Some(outcome),
            Err(err) => tracing::error!(error = %err, "scoring task failed to join"),
        }
    }

    // Restore input order so ties rank the same way as the sequential path.
    let outcomes = slots
        .into_iter()
        .zip(symbols)
        .map(|(slot, symbol)| {
            slot.unwrap_or_else(|| {
                Err(ScoringError::TaskFailed {
                    symbol,
                    reason: "task panicked or was cancelled".to_string(),
                })
            })
        })
        .collect();
    rank(outcomes, risk)
}

/// Joins per-symbol outcomes, dropping failures into `skipped`, then allocates.
pub fn rank(outcomes: Vec<Result<StockAnalysis, ScoringError>>, risk: RiskProfile) -> RecommendationSet {
    let mut analyses = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => analyses.push(analysis),
            Err(err) => {
                tracing::warn!(symbol = err.symbol(), error = %err, "symbol excluded from ranking");
                skipped.push(SkippedSymbol {
                    symbol: err.symbol().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    RecommendationSet {
        recommendations: allocate(analyses, risk),
        skipped,
    }
}

pub fn score_sentiment(text: &str) -> SentimentResult {
    SentimentScorer::default().score(text)
}

/// Scores each text on the blocking pool; results keep input order.
pub async fn score_sentiment_batch(texts: Vec<String>) -> anyhow::Result<Vec<SentimentResult>> {
    let mut tasks = JoinSet::new();
    for (idx, text) in texts.into_iter().enumerate() {
        tasks.spawn_blocking(move || (idx, score_sentiment(&text)));
    }

    let mut out: Vec<(usize, SentimentResult)> = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        out.push(joined?);
    }
    out.sort_by_key(|(idx, _)| *idx);
    Ok(out.into_iter().map(|(_, r)| r).collect())
}
