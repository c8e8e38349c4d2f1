pub mod allocation;
pub mod error;
pub mod indicators;
pub mod scorer;
pub mod trend;

/// Rounds to two decimals, used for every displayed number.
///
/// Exact binary ties (`0.125`) go away from zero rather than to even, so a value can differ from
/// banker's rounding by one cent. Non-tie values like `2.675` (stored just below the tie) still
/// round down.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
