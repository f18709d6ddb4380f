// =============================================================================
// MACD — Moving Average Convergence Divergence
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow), with the slow leg read `slow - fast`
//               positions ahead of the fast leg
//   signal    = EMA(signal_period) of the line
//   histogram = line - signal, right-aligned to the tail of the line
//
// Both offsets are kept in the two helpers below so they can be tested on
// their own. The line is labelled with bar `slow - 1` but holds no value
// until `2 * slow - fast` bars are available.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::ema::ema_of;
use crate::indicators::Series;
use crate::types::{closes, Bar};

/// Period triple for MACD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// The three MACD output series.
///
/// `start` on each series is a display label, not a bar mapping: the line is
/// labelled `slow - 1` yet its last value belongs to the latest bar, so
/// `at(bar_index)` does not line up with the bars. Use `latest()` or the raw
/// values instead of plotting by `at()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl MacdResult {
    fn empty(params: MacdParams) -> Self {
        let line_start = params.slow.saturating_sub(1);
        let signal_start = line_start + params.signal.saturating_sub(1);
        Self {
            macd: Series::empty(line_start),
            signal: Series::empty(signal_start),
            histogram: Series::empty(signal_start),
        }
    }
}

/// Compute MACD with the given periods.
///
/// The line is empty below `2 * slow - fast` bars and the signal line below
/// `2 * slow - fast + signal - 1`. All three series are empty when
/// `bars.len() < slow` or the periods are degenerate (`fast == 0`,
/// `signal == 0`, or `fast > slow`).
pub fn calculate_macd(bars: &[Bar], params: MacdParams) -> MacdResult {
    let MacdParams { fast, slow, signal } = params;
    if fast == 0 || signal == 0 || fast > slow || bars.len() < slow {
        return MacdResult::empty(params);
    }

    let values = closes(bars);
    let fast_ema = ema_of(&values, fast);
    let slow_ema = ema_of(&values, slow);

    let line = offset_difference(&fast_ema, &slow_ema, slow - fast);
    let signal_line = ema_of(&line, signal);

    let lag = tail_lag(line.len(), signal_line.len());
    let histogram: Vec<f64> = signal_line
        .iter()
        .enumerate()
        .map(|(i, s)| line[i + lag] - s)
        .collect();

    let line_start = slow - 1;
    let signal_start = line_start + signal - 1;
    MacdResult {
        macd: Series::new(line_start, line),
        signal: Series::new(signal_start, signal_line),
        histogram: Series::new(signal_start, histogram),
    }
}

/// `head[i] - tail[i + offset]` for every `i` with `i + offset < tail.len()`.
fn offset_difference(head: &[f64], tail: &[f64], offset: usize) -> Vec<f64> {
    head.iter()
        .zip(tail.iter().skip(offset))
        .map(|(h, t)| h - t)
        .collect()
}

/// How far the start of a shorter series sits into a longer one when both
/// end on the same element.
fn tail_lag(longer: usize, shorter: usize) -> usize {
    longer.saturating_sub(shorter)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn offset_difference_shifts_tail_forward() {
        let head = [10.0, 20.0, 30.0, 40.0];
        let tail = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(offset_difference(&head, &tail, 2), vec![7.0, 16.0]);
        assert_eq!(offset_difference(&head, &tail, 0), vec![9.0, 18.0, 27.0, 36.0]);
        assert!(offset_difference(&head, &tail, 4).is_empty());
    }

    #[test]
    fn tail_lag_right_aligns() {
        assert_eq!(tail_lag(11, 3), 8);
        assert_eq!(tail_lag(3, 3), 0);
        assert_eq!(tail_lag(0, 0), 0);
    }

    #[test]
    fn macd_empty_below_slow_period() {
        let bars = bars_from_closes(&wave(25));
        let result = calculate_macd(&bars, MacdParams::default());
        assert!(result.macd.is_empty());
        assert!(result.signal.is_empty());
        assert!(result.histogram.is_empty());
    }

    #[test]
    fn macd_degenerate_periods_are_empty() {
        let bars = bars_from_closes(&wave(100));
        let inverted = MacdParams { fast: 26, slow: 12, signal: 9 };
        assert!(calculate_macd(&bars, inverted).macd.is_empty());
        let zero_signal = MacdParams { fast: 12, slow: 26, signal: 0 };
        assert!(calculate_macd(&bars, zero_signal).macd.is_empty());
    }

    #[test]
    fn macd_lengths_follow_offsets() {
        // 60 bars: fast EMA 49, slow EMA 35, line 35 - 14 = 21, signal 21 - 8 = 13.
        let bars = bars_from_closes(&wave(60));
        let result = calculate_macd(&bars, MacdParams::default());
        assert_eq!(result.macd.len(), 21);
        assert_eq!(result.signal.len(), 13);
        assert_eq!(result.histogram.len(), 13);
        assert_eq!(result.macd.start(), 25);
        assert_eq!(result.signal.start(), 33);
        assert_eq!(result.histogram.start(), 33);
    }

    #[test]
    fn macd_line_uses_both_offsets() {
        let closes = wave(60);
        let bars = bars_from_closes(&closes);
        let result = calculate_macd(&bars, MacdParams::default());

        let fast = ema_of(&closes, 12);
        let slow = ema_of(&closes, 26);
        for i in 0..result.macd.len() {
            assert_eq!(result.macd[i], fast[i] - slow[i + 14]);
        }

        let signal = ema_of(result.macd.values(), 9);
        assert_eq!(result.signal.values(), signal.as_slice());
        for i in 0..result.histogram.len() {
            assert_eq!(result.histogram[i], result.macd[i + 8] - result.signal[i]);
        }
    }

    #[test]
    fn macd_start_is_a_label_not_a_bar_index() {
        let bars = bars_from_closes(&wave(60));
        let result = calculate_macd(&bars, MacdParams::default());
        assert_eq!(result.macd.end(), 60 - 14);
        assert_eq!(result.macd.at(59), None);
        assert_eq!(result.macd.latest(), result.macd.last().copied());
        assert!(result.macd.latest().is_some());
    }

    #[test]
    fn macd_line_too_short_for_signal() {
        // 40 bars: slow EMA 15 values, line 15 - 14 = 1, signal needs 9.
        let bars = bars_from_closes(&wave(40));
        let result = calculate_macd(&bars, MacdParams::default());
        assert_eq!(result.macd.len(), 1);
        assert!(result.signal.is_empty());
        assert!(result.histogram.is_empty());
    }
}
