// =============================================================================
// Central Application State — Signal Desk service
// =============================================================================
//
// The engine itself is stateless; the service only shares its configuration
// and a few counters between request handlers. Computed indicators are never
// retained between requests.
//
// Thread safety:
//   - Atomic counters for lock-free version and request tracking.
//   - parking_lot::RwLock for the runtime configuration.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::runtime_config::RuntimeConfig;

/// Shared state handed to every request handler via `Arc<AppState>`.
pub struct AppState {
    /// Incremented on every configuration change.
    pub state_version: AtomicU64,

    /// Number of analysis requests answered (indicators, signals,
    /// recommendation).
    pub requests_served: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Where configuration changes are persisted. `None` keeps changes in
    /// memory only.
    pub config_path: Option<PathBuf>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            requests_served: AtomicU64::new(0),
            runtime_config: Arc::new(RwLock::new(config)),
            config_path,
            start_time: std::time::Instant::now(),
        }
    }

    /// Bump the state version, returning the previous value.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Count one answered analysis request, returning the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let state = AppState::new(RuntimeConfig::default(), None);
        assert_eq!(state.current_state_version(), 0);
        assert_eq!(state.requests_served(), 0);
    }

    #[test]
    fn version_and_requests_increment() {
        let state = AppState::new(RuntimeConfig::default(), None);
        assert_eq!(state.increment_version(), 0);
        assert_eq!(state.current_state_version(), 1);
        assert_eq!(state.record_request(), 1);
        assert_eq!(state.record_request(), 2);
        assert_eq!(state.requests_served(), 2);
    }

    #[test]
    fn config_snapshot_is_detached() {
        let state = AppState::new(RuntimeConfig::default(), None);
        let mut snapshot = state.config();
        snapshot.max_bars = 1;
        assert_eq!(state.config().max_bars, 5000);
    }
}
