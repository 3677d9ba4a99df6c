use super::*;
use crate::config::{MaxPriceConfig, SelectorStrategy};
use tempfile::tempdir;

fn config_with(threshold: f64, max_price: Option<MaxPriceConfig>) -> SelectorConfig {
    SelectorConfig {
        strategy: SelectorStrategy::MinLatencyScore,
        min_ls_threshold: threshold,
        max_price,
    }
}

#[test]
fn test_validate_config_succeeds_on_defaults() {
    assert!(validate_config(&SelectorConfig::default()).is_ok());
}

#[test]
fn test_validate_rejects_non_positive_threshold() {
    let err = validate_config(&config_with(0.0, None)).unwrap_err();
    assert!(err.to_string().contains("min_ls_threshold must be > 0"));

    let err = validate_config(&config_with(-1.5, None)).unwrap_err();
    assert!(err.to_string().contains("got -1.5"));
}

#[test]
fn test_validate_rejects_non_finite_threshold() {
    let err = validate_config(&config_with(f64::NAN, None)).unwrap_err();
    assert!(err.to_string().contains("finite"));
    assert!(validate_config(&config_with(f64::INFINITY, None)).is_err());
}

#[test]
fn test_validate_rejects_bad_price_cap() {
    let zero_pixels = MaxPriceConfig {
        price_per_unit: 10,
        pixels_per_unit: 0,
    };
    let err = validate_config(&config_with(1.0, Some(zero_pixels))).unwrap_err();
    assert!(err.to_string().contains("pixels_per_unit must be > 0"));

    let negative_price = MaxPriceConfig {
        price_per_unit: -1,
        pixels_per_unit: 1,
    };
    let err = validate_config(&config_with(1.0, Some(negative_price))).unwrap_err();
    assert!(err.to_string().contains("price_per_unit must be >= 0"));
}

#[test]
fn test_validate_config_file_missing() {
    let dir = tempdir().unwrap();
    let err = validate_config_file(&dir.path().join("selection.toml")).unwrap_err();
    assert!(err.to_string().contains("No selector configuration found"));
}

#[test]
fn test_validate_config_file_valid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.toml");
    std::fs::write(&path, "strategy = \"initial-latency\"\nmin_ls_threshold = 2.0\n").unwrap();
    assert!(validate_config_file(&path).is_ok());
}
