//! Moving averages, RSI and MACD over closing prices.
//!
//! Rolling columns are `None` until their window is filled. The exponential columns are seeded
//! with the first close and therefore defined for every point of a non-empty series.

use crate::domain::price::PriceSeries;
use anyhow::Context;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

pub const MA_SHORT: usize = 5;
pub const MA_MEDIUM: usize = 10;
pub const MA_LONG: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const EMA_FAST: usize = 12;
pub const EMA_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorRow {
    pub close: f64,
    pub ma_5: Option<f64>,
    pub ma_10: Option<f64>,
    pub ma_20: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_12: f64,
    pub ema_26: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

/// Indicator rows aligned one-to-one with the input series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries) -> anyhow::Result<Self> {
        let closes = series.closes();

        let ma_5 = rolling_mean(&closes, MA_SHORT);
        let ma_10 = rolling_mean(&closes, MA_MEDIUM);
        let ma_20 = rolling_mean(&closes, MA_LONG);
        let rsi = rsi(&closes, RSI_PERIOD);
        let ema_12 = ema(&closes, EMA_FAST)?;
        let ema_26 = ema(&closes, EMA_SLOW)?;
        let macd: Vec<f64> = ema_12.iter().zip(&ema_26).map(|(f, s)| f - s).collect();
        let macd_signal = ema(&macd, MACD_SIGNAL)?;

        let rows = (0..closes.len())
            .map(|i| IndicatorRow {
                close: closes[i],
                ma_5: ma_5[i],
                ma_10: ma_10[i],
                ma_20: ma_20[i],
                rsi: rsi[i],
                ema_12: ema_12[i],
                ema_26: ema_26[i],
                macd: macd[i],
                macd_signal: macd_signal[i],
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

/// Simple trailing mean; the first `window - 1` entries are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for (i, w) in values.windows(window).enumerate() {
        out[i + window - 1] = Some(w.iter().sum::<f64>() / window as f64);
    }
    out
}

/// Recursive EMA with alpha = 2 / (span + 1), seeded with `values[0]`.
pub fn ema(values: &[f64], span: usize) -> anyhow::Result<Vec<f64>> {
    let mut ema = ExponentialMovingAverage::new(span)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid EMA span {span}"))?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

/// RSI over `period` rows of close-to-close deltas.
///
/// The first row has no predecessor and contributes a zero delta, so the first value appears at
/// index `period - 1`. A window without losses yields 100, including a perfectly flat window.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let deltas: Vec<f64> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| if i == 0 { 0.0 } else { c - closes[i - 1] })
        .collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(_), Some(loss)) if loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => Some(100.0 - 100.0 / (1.0 + gain / loss)),
            _ => None,
        })
        .collect()
}
