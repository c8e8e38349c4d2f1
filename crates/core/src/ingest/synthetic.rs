//! Offline price histories: a seeded random-walk generator and a fixed in-memory map.

use crate::domain::price::{PricePoint, PriceSeries};
use crate::ingest::provider::PriceHistoryProvider;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;

const NOISE_STDDEV: f64 = 0.01;

/// Linear drift from a random base price plus 1% Gaussian noise, one bar per day for `days + 1`
/// days ending at the end date.
#[derive(Debug, Clone, Default)]
pub struct SyntheticPriceProvider {
    seed: Option<u64>,
    end_date: Option<NaiveDate>,
}

impl SyntheticPriceProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            end_date: None,
        }
    }

    /// Pins the last bar's date instead of using today's UTC date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        match self.seed {
            // Per-symbol stream so results don't depend on request order.
            Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a(symbol)),
            None => StdRng::from_entropy(),
        }
    }

    pub fn generate(&self, symbol: &str, days: u32) -> Result<PriceSeries> {
        let mut rng = self.rng_for(symbol);
        let noise = Normal::new(0.0, NOISE_STDDEV).context("invalid noise distribution")?;
        let end = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .with_context(|| format!("{days} days of history from {end} is out of range"))?;
        let n = days as usize + 1;

        let base = f64::from(rng.gen_range(50u32..500));
        let target = base * (1.0 + rng.gen_range(-0.2..0.3));

        let points = start
            .iter_days()
            .take(n)
            .enumerate()
            .map(|(i, date)| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                let trend = base + (target - base) * t;
                let price = trend * (1.0 + noise.sample(&mut rng));
                PricePoint {
                    date,
                    open: price * 0.99,
                    high: price * 1.02,
                    low: price * 0.98,
                    close: price,
                    volume: f64::from(rng.gen_range(1_000_000u32..10_000_000)),
                }
            })
            .collect();

        Ok(PriceSeries::new(points))
    }
}

#[async_trait::async_trait]
impl PriceHistoryProvider for SyntheticPriceProvider {
    fn provider_name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch_history(&self, symbol: &str, days: u32) -> Result<PriceSeries> {
        self.generate(symbol, days)
    }
}

/// Fixed histories keyed by symbol. Unknown symbols are an error.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    histories: HashMap<String, PriceSeries>,
}

impl StaticPriceProvider {
    pub fn insert(&mut self, symbol: impl Into<String>, series: PriceSeries) {
        self.histories.insert(symbol.into(), series);
    }
}

#[async_trait::async_trait]
impl PriceHistoryProvider for StaticPriceProvider {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_history(&self, symbol: &str, _days: u32) -> Result<PriceSeries> {
        self.histories
            .get(symbol)
            .cloned()
            .with_context(|| format!("no price history for {symbol}"))
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
