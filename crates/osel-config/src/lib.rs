//! Selector configuration loading and validation (`selection.toml`).

pub mod config;
pub mod validate;

pub use config::{DEFAULT_MIN_LS_THRESHOLD, MaxPriceConfig, SelectorConfig, SelectorStrategy};
pub use validate::{validate_config, validate_config_file};
