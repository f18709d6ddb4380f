// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The first EMA value is exactly the first SMA value (not the first raw
// close), so the EMA series has the same length and anchor as the SMA series.
// =============================================================================

use crate::indicators::sma::sma_of;
use crate::indicators::Series;
use crate::types::{closes, Bar};

/// EMA of the closing prices of `bars`.
///
/// Returns an empty series when `bars.len() < period` or `period == 0`.
pub fn calculate_ema(bars: &[Bar], period: usize) -> Series {
    let values = closes(bars);
    Series::new(period.saturating_sub(1), ema_of(&values, period))
}

/// EMA over an arbitrary value slice, seeded with the SMA of the first
/// `period` values.
///
/// Used directly by MACD for the signal line, which is an EMA of the MACD
/// line rather than of prices.
pub fn ema_of(values: &[f64], period: usize) -> Vec<f64> {
    let seed = sma_of(values, period);
    let Some(&first) = seed.first() else {
        return Vec::new();
    };

    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(seed.len());
    result.push(first);

    let mut prev_ema = first;
    for &value in &values[period..] {
        let ema = (value - prev_ema) * multiplier + prev_ema;
        result.push(ema);
        prev_ema = ema;
    }

    result
}
