// =============================================================================
// Bar Validation — optional input policy applied before the engine runs
// =============================================================================
//
// The indicator and scoring functions never inspect their input. Callers that
// want malformed series rejected run `validate_bars` first; the service does
// so whenever the configured policy is `Strict`.
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Bar;

/// How strictly incoming bar series are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Reject non-finite prices, bad volume, and out-of-order timestamps.
    #[default]
    Strict,
    /// Pass every series through unchanged.
    Permissive,
}

impl std::fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index}: {field} is not a finite number ({value})")]
    NonFinitePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: volume must be finite and non-negative ({value})")]
    InvalidVolume { index: usize, value: f64 },

    #[error("bar {index}: timestamp {time} does not follow the previous bar")]
    OutOfOrder { index: usize, time: String },
}

/// Apply `policy` to `bars`.
pub fn check_bars(bars: &[Bar], policy: InputPolicy) -> Result<(), BarError> {
    match policy {
        InputPolicy::Strict => validate_bars(bars),
        InputPolicy::Permissive => Ok(()),
    }
}

/// Reject the first bar with a non-finite price, invalid volume, or a
/// timestamp that is not strictly after its predecessor.
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarError> {
    for (index, bar) in bars.iter().enumerate() {
        let prices = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() {
                return Err(BarError::NonFinitePrice {
                    index,
                    field,
                    value,
                });
            }
        }

        if let Some(volume) = bar.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(BarError::InvalidVolume {
                    index,
                    value: volume,
                });
            }
        }

        if index > 0 && bar.time <= bars[index - 1].time {
            return Err(BarError::OutOfOrder {
                index,
                time: bar.time.to_rfc3339(),
            });
        }
    }

    Ok(())
}
