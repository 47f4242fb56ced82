//! Configuration via `rankblend.toml`
//!
//! Every setting has a default, so an empty file (or no file at all) is a
//! valid configuration. On `rankblend init-config` a commented default file
//! is written; edit it and re-run.

use crate::error::{BlendError, Result};
use crate::types::Alpha;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "rankblend.toml";

/// Settings for the alpha sweep, under the `[tuning]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// First alpha of the grid (inclusive)
    #[serde(default = "default_grid_start")]
    pub start: f64,
    /// End of the grid (exclusive)
    #[serde(default = "default_grid_stop")]
    pub stop: f64,
    /// Grid step
    #[serde(default = "default_grid_step")]
    pub step: f64,
    /// Cutoff for NDCG@k
    #[serde(default = "default_ndcg_depth")]
    pub ndcg_depth: usize,
    /// Evaluate the queries of one alpha on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_grid_start() -> f64 {
    0.1
}

fn default_grid_stop() -> f64 {
    1.0
}

fn default_grid_step() -> f64 {
    0.1
}

fn default_ndcg_depth() -> usize {
    10
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            start: default_grid_start(),
            stop: default_grid_stop(),
            step: default_grid_step(),
            ndcg_depth: default_ndcg_depth(),
            parallel: false,
        }
    }
}

/// Configuration loaded from `rankblend.toml`.
///
/// # Example
///
/// ```toml
/// alpha = 0.5
/// top_k = 10
/// candidate_multiplier = 2
/// provider_timeout_ms = 2000
///
/// [tuning]
/// start = 0.1
/// stop = 1.0
/// step = 0.1
/// ndcg_depth = 10
/// parallel = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Fusion weight used by `search` and as the evaluation baseline
    #[serde(default)]
    pub alpha: Alpha,
    /// Number of fused results returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Each backend is asked for `top_k * candidate_multiplier` candidates
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
    /// Per-backend time limit in milliseconds; a backend that has not
    /// answered by then is treated as failed. No limit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_timeout_ms: Option<u64>,
    /// Alpha sweep settings
    #[serde(default)]
    pub tuning: TuningConfig,
}

fn default_top_k() -> usize {
    10
}

fn default_candidate_multiplier() -> usize {
    2
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            alpha: Alpha::default(),
            top_k: default_top_k(),
            candidate_multiplier: default_candidate_multiplier(),
            provider_timeout_ms: None,
            tuning: TuningConfig::default(),
        }
    }
}

impl BlendConfig {
    /// Check the values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero `top_k`, a zero multiplier, a
    /// zero provider timeout, a zero NDCG depth, or a degenerate grid.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(BlendError::invalid_config("top_k must be at least 1"));
        }
        if self.candidate_multiplier == 0 {
            return Err(BlendError::invalid_config(
                "candidate_multiplier must be at least 1",
            ));
        }
        if self.provider_timeout_ms == Some(0) {
            return Err(BlendError::invalid_config(
                "provider_timeout_ms must be at least 1 (omit it for no limit)",
            ));
        }
        let t = &self.tuning;
        if t.ndcg_depth == 0 {
            return Err(BlendError::invalid_config("tuning.ndcg_depth must be at least 1"));
        }
        if !(t.step.is_finite() && t.step > 0.0) {
            return Err(BlendError::invalid_config(format!(
                "tuning.step must be positive, got {}",
                t.step
            )));
        }
        if !(t.start.is_finite() && t.stop.is_finite() && t.start >= 0.0 && t.start < t.stop) {
            return Err(BlendError::invalid_config(format!(
                "tuning grid [{}, {}) is empty or out of range",
                t.start, t.stop
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# rankblend configuration
#
# Fusion weight: 1.0 = pure lexical, 0.0 = pure semantic.
alpha = 0.5

# Fused results returned per query.
top_k = 10

# Each backend is asked for top_k * candidate_multiplier candidates.
candidate_multiplier = 2

# Give up on a backend that has not answered within this many milliseconds
# and rank with the other one. Unset means wait indefinitely.
# provider_timeout_ms = 2000

[tuning]
# Alpha grid: start (inclusive) to stop (exclusive) in steps of step.
start = 0.1
stop = 1.0
step = 0.1

# Cutoff for NDCG@k.
ndcg_depth = 10

# Evaluate the queries of one alpha in parallel.
parallel = false
"#
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BlendError::invalid_config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: BlendConfig = toml::from_str(&content).map_err(|e| {
            BlendError::invalid_config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(true)` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml())?;
        Ok(true)
    }
}
