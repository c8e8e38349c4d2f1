use crate::analysis::error::ScoringError;
use crate::analysis::round2;
use crate::domain::contract::{RecommendationResponse, StockRecommendation, UserProfile};
use crate::domain::price::SymbolHistory;
use crate::domain::recommendation::SkippedSymbol;
use crate::engine::score_recommendations_concurrent;
use crate::ingest::provider::PriceHistoryProvider;
use crate::ingest::universe::{build_universe, company_name, UniverseOptions};
use chrono::Utc;
use std::sync::Arc;

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

#[derive(Clone)]
pub struct RecommendationService {
    prices: Arc<dyn PriceHistoryProvider>,
    history_days: u32,
}

impl RecommendationService {
    pub fn new(prices: Arc<dyn PriceHistoryProvider>, history_days: u32) -> Self {
        Self {
            prices,
            history_days,
        }
    }

    pub async fn generate(&self, profile: UserProfile) -> anyhow::Result<RecommendationResponse> {
        let profile = profile.validate_and_normalize()?;
        tracing::info!(
            risk = %profile.risk_tolerance,
            horizon = %profile.time_horizon,
            budget = profile.budget,
            provider = self.prices.provider_name(),
            "generating recommendations"
        );

        let universe = build_universe(
            profile.risk_tolerance,
            &UniverseOptions {
                sector_preferences: profile.sector_preferences.clone().unwrap_or_default(),
                exclusions: profile.exclusions.clone().unwrap_or_default(),
            },
        );

        let mut histories = Vec::with_capacity(universe.len());
        let mut skipped = Vec::new();
        for symbol in universe {
            match self.prices.fetch_history(&symbol, self.history_days).await {
                Ok(series) => {
                    tracing::debug!(symbol = %symbol, points = series.len(), "fetched price history");
                    histories.push(SymbolHistory::new(symbol, series));
                }
                Err(err) => {
                    let err = ScoringError::HistoryUnavailable {
                        symbol,
                        reason: format!("{err:#}"),
                    };
                    tracing::warn!(symbol = err.symbol(), error = %err, "price history unavailable");
                    skipped.push(SkippedSymbol {
                        symbol: err.symbol().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let set = score_recommendations_concurrent(
            histories,
            profile.risk_tolerance,
            profile.time_horizon.clone(),
            profile.budget,
        )
        .await;
        skipped.extend(set.skipped);

        let recommendations = set
            .recommendations
            .into_iter()
            .map(|rec| StockRecommendation {
                name: company_name(&rec.symbol).to_string(),
                confidence_score: rec.confidence,
                price: round2(rec.last_close),
                target_price: Some(rec.target_price),
                rationale: rec.rationale,
                suggested_allocation: rec.allocation,
                symbol: rec.symbol,
            })
            .collect();

        Ok(RecommendationResponse {
            recommendations,
            skipped,
            timestamp: Utc::now(),
        })
    }
}
