// =============================================================================
// Recommendation Scorer — signal tally + momentum => one composite verdict
// =============================================================================
//
//   score      = 5 + 0.5 * (bullish - bearish) + clamp(momentum% * 10, -2, 2)
//   action     = BUY if score >= 7, SELL if score <= 3, else HOLD
//   tier       = S >= 8, A >= 6.5, B >= 4.5, C >= 2.5, else D
//   confidence = clamp(score + 0.2 * signals, 1, 10)
//   risk       = High if |momentum%| > 2, Low if < 0.5, else Medium
//
// Every comparison uses the unrounded score; `score` and `confidence` are
// rounded to one decimal place only when the Recommendation is built.
// =============================================================================

use tracing::debug;

use crate::signals::generator::{generate_signals_with, SignalParams};
use crate::signals::momentum::price_momentum;
use crate::types::{Action, Bar, Indicator, IndicatorKind, Recommendation, RiskLevel, Signal, Tier};

/// Below this many bars the fixed fallback recommendation is returned.
pub const MIN_RECOMMENDATION_BARS: usize = 20;

const NEUTRAL_SCORE: f64 = 5.0;
const SIGNAL_WEIGHT: f64 = 0.5;
const MOMENTUM_WEIGHT: f64 = 10.0;
const MOMENTUM_CAP: f64 = 2.0;
const CONFIDENCE_PER_SIGNAL: f64 = 0.2;
const STRONG_MOVE_PCT: f64 = 1.0;

/// Recommend with the default signal parameters.
pub fn recommend(bars: &[Bar]) -> Recommendation {
    recommend_with(bars, &SignalParams::default())
}

/// Score `bars` into a single recommendation.
///
/// With fewer than [`MIN_RECOMMENDATION_BARS`] bars this returns
/// [`fallback_recommendation`] rather than an error.
pub fn recommend_with(bars: &[Bar], params: &SignalParams) -> Recommendation {
    if bars.len() < MIN_RECOMMENDATION_BARS {
        return fallback_recommendation(bars.len());
    }

    let momentum_pct = price_momentum(bars)
        .map(|m| m.change_percent)
        .unwrap_or(0.0);

    let signals = generate_signals_with(bars, params);
    let bullish = count_signal(&signals, Signal::Bullish);
    let bearish = count_signal(&signals, Signal::Bearish);
    let total = signals.len();

    let score = composite_score(bullish, bearish, momentum_pct);
    let confidence = (score + total as f64 * CONFIDENCE_PER_SIGNAL).clamp(1.0, 10.0);

    debug!(
        bars = bars.len(),
        bullish,
        bearish,
        total,
        momentum_pct,
        score,
        "recommendation scored"
    );

    Recommendation {
        action: action_for(score),
        tier: tier_for(score),
        score: round_one(score),
        confidence: round_one(confidence),
        risk_level: risk_for(momentum_pct),
        reasoning: format!(
            "Analysis of {total} technical signals: {bullish} bullish, {bearish} bearish. \
             Price momentum {momentum_pct:+.2}%."
        ),
        key_points: key_points(&signals, bullish, bearish, momentum_pct, params),
    }
}

/// The deterministic default returned for series that are too short to score.
pub fn fallback_recommendation(bar_count: usize) -> Recommendation {
    Recommendation {
        action: Action::Hold,
        tier: Tier::C,
        score: NEUTRAL_SCORE,
        confidence: NEUTRAL_SCORE,
        risk_level: RiskLevel::Medium,
        reasoning: "Insufficient data for technical analysis".to_string(),
        key_points: vec![format!(
            "Only {bar_count} bars available; at least {MIN_RECOMMENDATION_BARS} are required"
        )],
    }
}

fn count_signal(signals: &[Indicator], wanted: Signal) -> usize {
    signals.iter().filter(|s| s.signal == wanted).count()
}

fn composite_score(bullish: usize, bearish: usize, momentum_pct: f64) -> f64 {
    let net = bullish as f64 - bearish as f64;
    let momentum = (momentum_pct * MOMENTUM_WEIGHT).clamp(-MOMENTUM_CAP, MOMENTUM_CAP);
    NEUTRAL_SCORE + SIGNAL_WEIGHT * net + momentum
}

fn action_for(score: f64) -> Action {
    if score >= 7.0 {
        Action::Buy
    } else if score <= 3.0 {
        Action::Sell
    } else {
        Action::Hold
    }
}

fn tier_for(score: f64) -> Tier {
    if score >= 8.0 {
        Tier::S
    } else if score >= 6.5 {
        Tier::A
    } else if score >= 4.5 {
        Tier::B
    } else if score >= 2.5 {
        Tier::C
    } else {
        Tier::D
    }
}

fn risk_for(momentum_pct: f64) -> RiskLevel {
    let magnitude = momentum_pct.abs();
    if magnitude > 2.0 {
        RiskLevel::High
    } else if magnitude < 0.5 {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

/// Key points in fixed order: signal balance, strong move, RSI extreme.
/// Never empty.
fn key_points(
    signals: &[Indicator],
    bullish: usize,
    bearish: usize,
    momentum_pct: f64,
    params: &SignalParams,
) -> Vec<String> {
    let mut points = Vec::new();

    if bullish > bearish {
        points.push("Technical indicators favor bullish sentiment".to_string());
    } else if bearish > bullish {
        points.push("Technical indicators show bearish pressure".to_string());
    }

    if momentum_pct.abs() > STRONG_MOVE_PCT {
        points.push(format!(
            "Strong price movement of {momentum_pct:+.2}% in the latest bar"
        ));
    }

    if let Some(rsi) = signals.iter().find(|s| s.kind == IndicatorKind::Rsi) {
        if rsi.value < params.rsi_oversold {
            points.push(format!("RSI at {:.1} indicates oversold conditions", rsi.value));
        } else if rsi.value > params.rsi_overbought {
            points.push(format!("RSI at {:.1} indicates overbought conditions", rsi.value));
        }
    }

    if points.is_empty() {
        points.push("Mixed signals with no dominant direction".to_string());
    }

    points
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
