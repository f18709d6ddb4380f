// =============================================================================
// Signal Generator — latest indicator readings mapped to categorical signals
// =============================================================================
//
// Three independent rules, each emitted only when its source series is
// non-empty:
//
//   RSI              < oversold  => Bullish,  > overbought => Bearish
//   MACD             line > signal && hist > 0 => Bullish,
//                    line < signal && hist < 0 => Bearish
//   Moving Averages  close > SMA(short) > SMA(long) => Bullish,
//                    close < SMA(short) < SMA(long) => Bearish
//
// Anything else is Neutral. Below `min_bars` no indicators are produced.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{calculate_macd, calculate_rsi, calculate_sma, MacdParams};
use crate::types::{Bar, Indicator, IndicatorKind, Signal};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_min_bars() -> usize {
    50
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_ma_short() -> usize {
    20
}

fn default_ma_long() -> usize {
    50
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_std_dev() -> f64 {
    2.0
}

// =============================================================================
// SignalParams
// =============================================================================

/// Periods and thresholds used by the signal rules and the indicator panel.
///
/// The defaults reproduce the dashboard's fixed rules exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    /// Fewer bars than this produce no indicators at all.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// RSI strictly below this reads as oversold (bullish).
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// RSI strictly above this reads as overbought (bearish).
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_ma_short")]
    pub ma_short: usize,

    #[serde(default = "default_ma_long")]
    pub ma_long: usize,

    /// Panel only; Bollinger Bands do not vote.
    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    #[serde(default = "default_bollinger_std_dev")]
    pub bollinger_std_dev: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            min_bars: default_min_bars(),
            rsi_period: default_rsi_period(),
            rsi_oversold: default_rsi_oversold(),
            rsi_overbought: default_rsi_overbought(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            ma_short: default_ma_short(),
            ma_long: default_ma_long(),
            bollinger_period: default_bollinger_period(),
            bollinger_std_dev: default_bollinger_std_dev(),
        }
    }
}

impl SignalParams {
    pub fn macd(&self) -> MacdParams {
        MacdParams {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        }
    }

    /// Check the parameters for combinations that can never produce a
    /// meaningful signal. Returns a description of every problem found.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ma_short", self.ma_short),
            ("ma_long", self.ma_long),
            ("bollinger_period", self.bollinger_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                problems.push(format!("{name} must be at least 1"));
            }
        }

        if self.macd_fast > self.macd_slow {
            problems.push(format!(
                "macd_fast ({}) must not exceed macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if self.ma_short > self.ma_long {
            problems.push(format!(
                "ma_short ({}) must not exceed ma_long ({})",
                self.ma_short, self.ma_long
            ));
        }
        if !(self.rsi_oversold < self.rsi_overbought) {
            problems.push(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            ));
        }
        if !self.bollinger_std_dev.is_finite() || self.bollinger_std_dev < 0.0 {
            problems.push("bollinger_std_dev must be a non-negative number".to_string());
        }

        problems
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Generate signals with the default parameters.
pub fn generate_signals(bars: &[Bar]) -> Vec<Indicator> {
    generate_signals_with(bars, &SignalParams::default())
}

/// Generate signals for the latest bar of `bars`.
///
/// Order is fixed: RSI, MACD, Moving Averages.
pub fn generate_signals_with(bars: &[Bar], params: &SignalParams) -> Vec<Indicator> {
    let mut signals = Vec::with_capacity(3);

    if bars.len() < params.min_bars {
        return signals;
    }

    if let Some(rsi) = calculate_rsi(bars, params.rsi_period).latest() {
        signals.push(Indicator {
            name: format!("RSI ({})", params.rsi_period),
            kind: IndicatorKind::Rsi,
            value: rsi,
            signal: classify_rsi(rsi, params),
        });
    }

    let macd = calculate_macd(bars, params.macd());
    if let (Some(line), Some(signal), Some(histogram)) = (
        macd.macd.latest(),
        macd.signal.latest(),
        macd.histogram.latest(),
    ) {
        signals.push(Indicator {
            name: "MACD".to_string(),
            kind: IndicatorKind::Macd,
            value: line,
            signal: classify_macd(line, signal, histogram),
        });
    }

    let sma_short = calculate_sma(bars, params.ma_short).latest();
    let sma_long = calculate_sma(bars, params.ma_long).latest();
    if let (Some(short), Some(long), Some(last)) = (sma_short, sma_long, bars.last()) {
        signals.push(Indicator {
            name: "Moving Averages".to_string(),
            kind: IndicatorKind::MovingAverages,
            value: last.close,
            signal: classify_moving_averages(last.close, short, long),
        });
    }

    signals
}

fn classify_rsi(rsi: f64, params: &SignalParams) -> Signal {
    if rsi < params.rsi_oversold {
        Signal::Bullish
    } else if rsi > params.rsi_overbought {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

fn classify_macd(line: f64, signal: f64, histogram: f64) -> Signal {
    if line > signal && histogram > 0.0 {
        Signal::Bullish
    } else if line < signal && histogram < 0.0 {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

fn classify_moving_averages(close: f64, short: f64, long: f64) -> Signal {
    if close > short && short > long {
        Signal::Bullish
    } else if close < short && short < long {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn no_signals_below_fifty_bars() {
        let bars = bars_from_closes(&ascending(49));
        assert!(generate_signals(&bars).is_empty());
    }

    #[test]
    fn rising_market_with_default_params() {
        let bars = bars_from_closes(&ascending(80));
        let signals = generate_signals(&bars);
        assert_eq!(signals.len(), 3);

        assert_eq!(signals[0].kind, IndicatorKind::Rsi);
        assert_eq!(signals[0].name, "RSI (14)");
        assert_eq!(signals[0].value, 100.0);
        assert_eq!(signals[0].signal, Signal::Bearish);

        assert_eq!(signals[2].kind, IndicatorKind::MovingAverages);
        assert_eq!(signals[2].value, 180.0);
        assert_eq!(signals[2].signal, Signal::Bullish);
    }

    #[test]
    fn falling_market_moving_averages_bearish() {
        let closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();
        let signals = generate_signals(&bars_from_closes(&closes));
        let ma = signals
            .iter()
            .find(|s| s.kind == IndicatorKind::MovingAverages)
            .unwrap();
        assert_eq!(ma.signal, Signal::Bearish);
        let rsi = signals.iter().find(|s| s.kind == IndicatorKind::Rsi).unwrap();
        assert_eq!(rsi.signal, Signal::Bullish);
    }

    #[test]
    fn macd_omitted_when_signal_line_empty() {
        // 50 bars: MACD line has 11 values, enough for a 9-period signal.
        // 45 bars with min_bars lowered: line has 6 values, signal is empty.
        let params = SignalParams {
            min_bars: 45,
            ..SignalParams::default()
        };
        let signals = generate_signals_with(&bars_from_closes(&ascending(45)), &params);
        assert!(signals.iter().all(|s| s.kind != IndicatorKind::Macd));

        let signals = generate_signals(&bars_from_closes(&ascending(50)));
        assert!(signals.iter().any(|s| s.kind == IndicatorKind::Macd));
    }

    #[test]
    fn classify_rsi_boundaries_are_strict() {
        let params = SignalParams::default();
        assert_eq!(classify_rsi(29.999, &params), Signal::Bullish);
        assert_eq!(classify_rsi(30.0, &params), Signal::Neutral);
        assert_eq!(classify_rsi(70.0, &params), Signal::Neutral);
        assert_eq!(classify_rsi(70.001, &params), Signal::Bearish);
    }

    #[test]
    fn classify_macd_requires_histogram_agreement() {
        assert_eq!(classify_macd(1.0, 0.5, 0.5), Signal::Bullish);
        assert_eq!(classify_macd(1.0, 0.5, -0.1), Signal::Neutral);
        assert_eq!(classify_macd(0.5, 1.0, -0.5), Signal::Bearish);
        assert_eq!(classify_macd(1.0, 1.0, 0.0), Signal::Neutral);
    }

    #[test]
    fn classify_moving_averages_needs_full_stack() {
        assert_eq!(classify_moving_averages(3.0, 2.0, 1.0), Signal::Bullish);
        assert_eq!(classify_moving_averages(1.0, 2.0, 3.0), Signal::Bearish);
        assert_eq!(classify_moving_averages(3.0, 1.0, 2.0), Signal::Neutral);
    }

    #[test]
    fn default_params_are_consistent() {
        assert!(SignalParams::default().problems().is_empty());
    }

    #[test]
    fn problems_reports_bad_combinations() {
        let params = SignalParams {
            macd_fast: 30,
            rsi_period: 0,
            rsi_oversold: 80.0,
            ..SignalParams::default()
        };
        let problems = params.problems();
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn deserialise_partial_params_fills_defaults() {
        let params: SignalParams = serde_json::from_str(r#"{ "rsi_period": 21 }"#).unwrap();
        assert_eq!(params.rsi_period, 21);
        assert_eq!(params.macd_slow, 26);
        assert_eq!(params.min_bars, 50);
    }
}
