//! End-to-end scenarios through the public engine API.

use chrono::{Duration, TimeZone, Utc};
use signal_desk::indicators::{calculate_macd, calculate_rsi, MacdParams};
use signal_desk::signals::{generate_signals_with, SignalParams};
use signal_desk::{
    generate_signals, recommend, Action, Bar, IndicatorKind, RiskLevel, Signal, Tier,
};

fn bars(closes: &[f64]) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::flat(base + Duration::hours(i as i64), c))
        .collect()
}

/// `n - 1` flat bars at 100 followed by one bar at `last`.
fn flat_then(n: usize, last: f64) -> Vec<Bar> {
    let mut closes = vec![100.0; n - 1];
    closes.push(last);
    bars(&closes)
}

#[test]
fn short_series_gets_fallback() {
    for n in [0, 1, 5, 19] {
        let rec = recommend(&bars(&vec![100.0; n]));
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.tier, Tier::C);
        assert_eq!(rec.score, 5.0);
        assert_eq!(rec.confidence, 5.0);
        assert_eq!(rec.risk_level, RiskLevel::Medium);
        assert_eq!(rec.key_points.len(), 1);
        assert!(rec.reasoning.contains("Insufficient data"));
    }
}

#[test]
fn falling_series_is_oversold() {
    let closes: Vec<f64> = (0..20).map(|i| 200.0 - 3.0 * i as f64).collect();
    let series = bars(&closes);

    let rsi = calculate_rsi(&series, 14);
    assert_eq!(rsi.start(), 14);
    assert_eq!(rsi.latest(), Some(0.0));

    let params = SignalParams {
        min_bars: 20,
        ..SignalParams::default()
    };
    let signals = generate_signals_with(&series, &params);
    assert_eq!(signals.len(), 1, "only RSI has enough history");
    assert_eq!(signals[0].kind, IndicatorKind::Rsi);
    assert_eq!(signals[0].signal, Signal::Bullish);
}

#[test]
fn long_falling_series_signals() {
    let closes: Vec<f64> = (0..60).map(|i| 300.0 - 2.0 * i as f64).collect();
    let signals = generate_signals(&bars(&closes));

    let kinds: Vec<_> = signals.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::MovingAverages]
    );
    assert_eq!(signals[0].signal, Signal::Bullish);
    assert_eq!(signals[2].signal, Signal::Bearish);
}

#[test]
fn momentum_contribution_is_capped() {
    // +50% on the last bar would add 500 points uncapped.
    let rec = recommend(&flat_then(20, 150.0));
    assert_eq!(rec.score, 7.0);
    assert_eq!(rec.action, Action::Buy);
    assert_eq!(rec.tier, Tier::A);
    assert_eq!(rec.confidence, 7.0);
    assert_eq!(rec.risk_level, RiskLevel::High);
    assert_eq!(
        rec.reasoning,
        "Analysis of 0 technical signals: 0 bullish, 0 bearish. Price momentum +50.00%."
    );
    assert_eq!(
        rec.key_points,
        vec!["Strong price movement of +50.00% in the latest bar".to_string()]
    );
}

#[test]
fn crash_is_capped_on_the_downside() {
    let rec = recommend(&flat_then(20, 10.0));
    assert_eq!(rec.score, 3.0);
    assert_eq!(rec.action, Action::Sell);
    assert_eq!(rec.tier, Tier::C);
    assert_eq!(rec.risk_level, RiskLevel::High);
}

#[test]
fn thresholds_use_unrounded_score() {
    // +0.196% momentum: raw score 6.96 displays as 7.0 but stays HOLD.
    let rec = recommend(&flat_then(20, 100.196));
    assert_eq!(rec.score, 7.0);
    assert_eq!(rec.action, Action::Hold);
    assert_eq!(rec.tier, Tier::A);
    assert_eq!(rec.risk_level, RiskLevel::Low);
}

#[test]
fn flat_series_is_neutral() {
    let rec = recommend(&flat_then(20, 100.0));
    assert_eq!(rec.score, 5.0);
    assert_eq!(rec.action, Action::Hold);
    assert_eq!(rec.tier, Tier::B);
    assert_eq!(rec.risk_level, RiskLevel::Low);
    assert_eq!(rec.key_points, vec!["Mixed signals with no dominant direction".to_string()]);
}

#[test]
fn macd_needs_slow_period_of_history() {
    let short = calculate_macd(&flat_then(25, 100.0), MacdParams::default());
    assert!(short.macd.is_empty());
    assert!(short.signal.is_empty());
    assert!(short.histogram.is_empty());

    // The line pairs fastEMA[i] with slowEMA[i + 14], so 26 bars are still
    // not enough; the first value appears at 2 * slow - fast = 40 bars.
    let at_slow = calculate_macd(&flat_then(26, 100.0), MacdParams::default());
    assert!(at_slow.macd.is_empty());

    let first_line = calculate_macd(&flat_then(40, 100.0), MacdParams::default());
    assert_eq!(first_line.macd.len(), 1);
    assert_eq!(first_line.macd.start(), 25);
    assert!(first_line.signal.is_empty());

    // The signal line needs 8 more: 2 * slow - fast + signal - 1 = 48 bars.
    let first_signal = calculate_macd(&flat_then(48, 100.0), MacdParams::default());
    assert_eq!(first_signal.macd.len(), 9);
    assert_eq!(first_signal.signal.len(), 1);
    assert_eq!(first_signal.histogram.len(), 1);
}

#[test]
fn recommendation_serialises_for_the_dashboard() {
    let rec = recommend(&flat_then(20, 150.0));
    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["action"], "BUY");
    assert_eq!(json["riskLevel"], "High");
    assert!(json["keyPoints"].is_array());
}
