// =============================================================================
// Signal Desk — technical indicator & recommendation scoring engine
// =============================================================================
//
// Pipeline: bars -> {SMA, EMA, RSI} -> {MACD, Bollinger} -> signals ->
// recommendation. Every engine function is a pure, re-entrant transformation
// of its input series; the `api`, `app_state` and `runtime_config` modules wrap
// it in an HTTP service.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod indicators;
pub mod runtime_config;
pub mod signals;
pub mod types;
pub mod validation;

pub use signals::{generate_signals, recommend};
pub use types::{Action, Bar, Indicator, IndicatorKind, Recommendation, RiskLevel, Signal, Tier};
