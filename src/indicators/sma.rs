// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean of the last `period` closes. The first value belongs to bar
// `period - 1`; the output has `len - period + 1` elements.
// =============================================================================

use crate::indicators::Series;
use crate::types::{closes, Bar};

/// SMA of the closing prices of `bars`.
///
/// Returns an empty series when `bars.len() < period` or `period == 0`.
pub fn calculate_sma(bars: &[Bar], period: usize) -> Series {
    let values = closes(bars);
    Series::new(period.saturating_sub(1), sma_of(&values, period))
}

/// SMA over an arbitrary value slice.
///
/// Each window is summed independently so every output is the exact mean of
/// its window rather than the product of a running sum.
pub fn sma_of(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period_f)
        .collect()
}
