use thiserror::Error;

/// Failures local to one symbol. They exclude that symbol from the ranking and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("insufficient data for {symbol}: price series is empty")]
    InsufficientData { symbol: String },

    #[error("indicators for {symbol} could not be computed: {reason}")]
    IndicatorFailed { symbol: String, reason: String },

    #[error("failed to fetch price history for {symbol}: {reason}")]
    HistoryUnavailable { symbol: String, reason: String },

    #[error("scoring task for {symbol} did not complete: {reason}")]
    TaskFailed { symbol: String, reason: String },
}

impl ScoringError {
    pub fn symbol(&self) -> &str {
        match self {
            Self::InsufficientData { symbol }
            | Self::IndicatorFailed { symbol, .. }
            | Self::HistoryUnavailable { symbol, .. }
            | Self::TaskFailed { symbol, .. } => symbol,
        }
    }
}
