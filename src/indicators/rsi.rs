// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: Compute close-to-close changes and split them into gains/losses.
// Step 2: Seed average gain / average loss with the mean of the first
//         `period` gains / losses.
// Step 3: Carry the averages forward with Wilder's recurrence:
//           avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//           avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS), or exactly 100 when avg_loss == 0.
//
// The recurrence never resets: the value at bar n depends on every change
// since the seed window, so it is computed as a scan over the changes.
// =============================================================================

use crate::indicators::Series;
use crate::types::{closes, Bar};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Compute the RSI series for `bars`.
///
/// The first value belongs to bar `period` (the first `period` changes are
/// consumed by the seed).
///
/// # Edge cases
/// - `period == 0` => empty series
/// - `bars.len() < period + 1` => empty series
/// - average loss of zero => 100.0 at that step, including flat markets
pub fn calculate_rsi(bars: &[Bar], period: usize) -> Series {
    Series::new(period, rsi_of(&closes(bars), period))
}

/// RSI over an arbitrary value slice.
pub fn rsi_of(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period + 1 {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { change.abs() } else { 0.0 };
            (gain, loss)
        })
        .unzip();

    let period_f = period as f64;
    let seed = (
        gains[..period].iter().sum::<f64>() / period_f,
        losses[..period].iter().sum::<f64>() / period_f,
    );

    let smoothed = gains[period..]
        .iter()
        .zip(&losses[period..])
        .scan(seed, |(avg_gain, avg_loss), (&gain, &loss)| {
            *avg_gain = (*avg_gain * (period_f - 1.0) + gain) / period_f;
            *avg_loss = (*avg_loss * (period_f - 1.0) + loss) / period_f;
            Some((*avg_gain, *avg_loss))
        });

    std::iter::once(seed)
        .chain(smoothed)
        .map(|(avg_gain, avg_loss)| rsi_from_averages(avg_gain, avg_loss))
        .collect()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
