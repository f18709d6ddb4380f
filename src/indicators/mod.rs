// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the
// recommendation engine. Every function returns a `Series` anchored to the
// bar index of its first value; insufficient input yields an empty series,
// never an error. No function validates its input.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod panel;
pub mod rsi;
pub mod series;
pub mod sma;

pub use bollinger::{calculate_bollinger, BollingerBands, BollingerSnapshot};
pub use ema::{calculate_ema, ema_of};
pub use macd::{calculate_macd, MacdParams, MacdResult};
pub use panel::{compute_panel, IndicatorPanel};
pub use rsi::{calculate_rsi, rsi_of};
pub use series::Series;
pub use sma::{calculate_sma, sma_of};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};

    use crate::types::Bar;

    /// Daily bars with the given closes; open is the previous close.
    pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    time: base + Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: Some(1000.0),
                }
            })
            .collect()
    }
}
