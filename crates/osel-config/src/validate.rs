use anyhow::{Result, bail};
use std::path::Path;

use crate::config::SelectorConfig;

/// Load and validate a selector configuration file.
pub fn validate_config_file(path: &Path) -> Result<()> {
    match SelectorConfig::load(path)? {
        Some(config) => validate_config(&config),
        None => bail!("No selector configuration found at {}", path.display()),
    }
}

/// Validate an already-loaded selector configuration.
pub fn validate_config(config: &SelectorConfig) -> Result<()> {
    validate_threshold(config)?;
    validate_max_price(config)?;
    Ok(())
}

fn validate_threshold(config: &SelectorConfig) -> Result<()> {
    let threshold = config.min_ls_threshold;
    if !threshold.is_finite() {
        bail!("min_ls_threshold must be a finite number (got {threshold})");
    }
    if threshold <= 0.0 {
        bail!(
            "min_ls_threshold must be > 0 (got {threshold}). \
             No known session could ever count as good enough."
        );
    }
    Ok(())
}

fn validate_max_price(config: &SelectorConfig) -> Result<()> {
    let Some(max_price) = config.max_price else {
        return Ok(());
    };
    if max_price.pixels_per_unit <= 0 {
        bail!(
            "max_price.pixels_per_unit must be > 0 (got {})",
            max_price.pixels_per_unit
        );
    }
    if max_price.price_per_unit < 0 {
        bail!(
            "max_price.price_per_unit must be >= 0 (got {})",
            max_price.price_per_unit
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
