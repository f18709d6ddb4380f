// =============================================================================
// Runtime Configuration — Hot-reloadable service settings with atomic save
// =============================================================================
//
// Every tunable parameter of the Signal Desk service lives here so that the
// signal rules can be adjusted at runtime without a restart.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::signals::SignalParams;
use crate::validation::InputPolicy;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";

fn default_max_bars() -> usize {
    5000
}

/// Top-level runtime configuration for the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Whether posted bar series are validated before scoring.
    #[serde(default)]
    pub input_policy: InputPolicy,

    /// Largest bar series accepted in a single request.
    #[serde(default = "default_max_bars")]
    pub max_bars: usize,

    /// Periods and thresholds for the indicator panel and signal rules.
    #[serde(default)]
    pub signal_params: SignalParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            input_policy: InputPolicy::default(),
            max_bars: default_max_bars(),
            signal_params: SignalParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            input_policy = %config.input_policy,
            max_bars = config.max_bars,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Everything wrong with this configuration, empty when it is usable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = self.signal_params.problems();
        if self.max_bars == 0 {
            problems.push("max_bars must be at least 1".to_string());
        }
        problems
    }
}
