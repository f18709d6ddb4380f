// =============================================================================
// Shared types used across the Signal Desk engine
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLC(+volume) observation.
///
/// Bars are expected oldest-first. Field aliases accept the short keys the
/// dashboard sends (`t`, `o`, `h`, `l`, `c`, `v`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(alias = "t")]
    pub time: DateTime<Utc>,
    #[serde(alias = "o")]
    pub open: f64,
    #[serde(alias = "h")]
    pub high: f64,
    #[serde(alias = "l")]
    pub low: f64,
    #[serde(alias = "c")]
    pub close: f64,
    #[serde(default, alias = "v", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// A bar whose open, high, low and close all equal `value`.
    pub fn flat(time: DateTime<Utc>, value: f64) -> Self {
        Self {
            time,
            open: value,
            high: value,
            low: value,
            close: value,
            volume: None,
        }
    }
}

/// Extract the closing prices of `bars` in order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Categorical reading of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Which rule produced an [`Indicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MovingAverages,
}

/// A named indicator reading with its categorical signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub kind: IndicatorKind,
    /// RSI value, MACD line value, or latest close, depending on `kind`.
    pub value: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Quality grade of a recommendation, S (best) to D (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "S-Tier",
            Self::A => "A-Tier",
            Self::B => "B-Tier",
            Self::C => "C-Tier",
            Self::D => "D-Tier",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::S => "Exceptional Signal",
            Self::A => "Strong Signal",
            Self::B => "Moderate Signal",
            Self::C => "Weak Signal",
            Self::D => "Very Weak Signal",
        }
    }

    /// Bar count shown next to the tier badge: 5 for S down to 1 for D.
    pub fn strength(&self) -> u8 {
        match self {
            Self::S => 5,
            Self::A => 4,
            Self::B => 3,
            Self::C => 2,
            Self::D => 1,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Composite trading recommendation for one bar series.
///
/// `score` and `confidence` are rounded to one decimal place; the action,
/// tier and confidence were derived from the unrounded score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: Action,
    pub tier: Tier,
    pub score: f64,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub key_points: Vec<String>,
}
