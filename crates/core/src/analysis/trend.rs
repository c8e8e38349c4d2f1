use crate::domain::price::PriceSeries;

pub const SHORT_WINDOW: usize = 5;
pub const MEDIUM_WINDOW: usize = 20;

/// Direction flag times consistency, per window. Both in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendStrength {
    pub short_term: f64,
    pub medium_term: f64,
}

impl TrendStrength {
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        Self {
            short_term: window_strength(tail(&closes, SHORT_WINDOW)),
            medium_term: window_strength(tail(&closes, MEDIUM_WINDOW)),
        }
    }
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Zero unless the window closes above where it opened. Otherwise the share of points whose
/// close rose over the previous point of the window. The window's first point has no previous
/// point and counts as not rising.
fn window_strength(window: &[f64]) -> f64 {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return 0.0;
    };
    if last <= first {
        return 0.0;
    }

    let rising = window
        .windows(2)
        .filter(|w| w[0] != 0.0 && (w[1] - w[0]) / w[0] > 0.0)
        .count();
    rising as f64 / window.len() as f64
}
