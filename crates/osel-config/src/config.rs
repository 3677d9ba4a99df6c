use anyhow::{Context, Result};
use osel_core::{PriceInfo, PriceRat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Default score threshold below which a known session counts as good enough.
pub const DEFAULT_MIN_LS_THRESHOLD: f64 = 1.0;

/// Which selector the broadcaster runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorStrategy {
    /// Ordered pool sorted by the latency announced at discovery.
    InitialLatency,
    /// Ordered pool sorted by the last measured latency score.
    LatencyScore,
    /// Two-tier selector: exploit known-good sessions, explore unknown ones.
    #[default]
    MinLatencyScore,
}

/// Maximum price the broadcaster is willing to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxPriceConfig {
    pub price_per_unit: i64,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: i64,
}

fn default_pixels_per_unit() -> i64 {
    1
}

impl From<MaxPriceConfig> for PriceInfo {
    fn from(cfg: MaxPriceConfig) -> Self {
        PriceInfo {
            price_per_unit: cfg.price_per_unit,
            pixels_per_unit: cfg.pixels_per_unit,
        }
    }
}

/// Selector configuration (`selection.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub strategy: SelectorStrategy,
    /// Latency score a known session must stay strictly below to be reused
    /// ahead of unexplored sessions.
    #[serde(default = "default_min_ls_threshold")]
    pub min_ls_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<MaxPriceConfig>,
}

fn default_min_ls_threshold() -> f64 {
    DEFAULT_MIN_LS_THRESHOLD
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            strategy: SelectorStrategy::default(),
            min_ls_threshold: DEFAULT_MIN_LS_THRESHOLD,
            max_price: None,
        }
    }
}

impl SelectorConfig {
    /// Load a config file. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read selector config: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse selector config: {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if let Ok(raw) = toml::from_str::<toml::Table>(content) {
            warn_unknown_keys(&raw);
        }
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Price cap as a rational, if one is configured and well formed.
    pub fn max_price_rat(&self) -> Option<PriceRat> {
        self.max_price
            .map(PriceInfo::from)
            .and_then(|info| info.to_rat())
    }
}

fn warn_unknown_keys(table: &toml::Table) {
    const KNOWN: [&str; 3] = ["strategy", "min_ls_threshold", "max_price"];
    for key in table.keys() {
        if !KNOWN.contains(&key.as_str()) {
            warn!(key = %key, "Ignoring unknown selector config key");
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
