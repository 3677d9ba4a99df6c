use super::*;
use tempfile::tempdir;

#[test]
fn test_load_nonexistent_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.toml");
    assert!(SelectorConfig::load(&path).unwrap().is_none());
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = SelectorConfig::from_toml_str("").unwrap();
    assert_eq!(config, SelectorConfig::default());
    assert_eq!(config.strategy, SelectorStrategy::MinLatencyScore);
    assert_eq!(config.min_ls_threshold, DEFAULT_MIN_LS_THRESHOLD);
    assert!(config.max_price_rat().is_none());
}

#[test]
fn test_parse_full_config() {
    let config = SelectorConfig::from_toml_str(
        r#"
strategy = "latency-score"
min_ls_threshold = 0.75

[max_price]
price_per_unit = 1000
pixels_per_unit = 3
"#,
    )
    .unwrap();
    assert_eq!(config.strategy, SelectorStrategy::LatencyScore);
    assert_eq!(config.min_ls_threshold, 0.75);
    assert_eq!(
        config.max_price_rat(),
        Some(PriceRat::new(1000, 3).unwrap())
    );
}

#[test]
fn test_max_price_pixels_default_to_one() {
    let config = SelectorConfig::from_toml_str("[max_price]\nprice_per_unit = 42\n").unwrap();
    assert_eq!(config.max_price_rat(), Some(PriceRat::new(42, 1).unwrap()));
}

#[test]
fn test_unknown_strategy_is_rejected() {
    let err = SelectorConfig::from_toml_str("strategy = \"random\"").unwrap_err();
    assert!(err.to_string().contains("random"));
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.toml");
    let config = SelectorConfig {
        strategy: SelectorStrategy::InitialLatency,
        min_ls_threshold: 2.5,
        max_price: Some(MaxPriceConfig {
            price_per_unit: 10,
            pixels_per_unit: 2,
        }),
    };
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = SelectorConfig::load(&path).unwrap().unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_reports_path_on_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("selection.toml");
    std::fs::write(&path, "min_ls_threshold = [not valid").unwrap();

    let err = SelectorConfig::load(&path).unwrap_err();
    assert!(
        err.to_string().contains("Failed to parse selector config"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config =
        SelectorConfig::from_toml_str("min_ls_threshold = 2.0\nlayers = [\"base\"]\n").unwrap();
    assert_eq!(config.min_ls_threshold, 2.0);
    assert_eq!(config.strategy, SelectorStrategy::MinLatencyScore);
}
