use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar. `high >= max(open, close) >= min(open, close) >= low` is expected but not
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily bars for one symbol, ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Builds a series from closing prices alone, one point per day starting at `start`.
    /// open/high/low mirror the close and volume is zero.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint {
                date,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// A symbol and its history. Requests carry these in caller order; that order breaks score ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolHistory {
    pub symbol: String,
    pub series: PriceSeries,
}

impl SymbolHistory {
    pub fn new(symbol: impl Into<String>, series: PriceSeries) -> Self {
        Self {
            symbol: symbol.into(),
            series,
        }
    }
}
