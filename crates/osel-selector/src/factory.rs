//! Build the configured selector from a [`SelectorConfig`].

use std::sync::Arc;

use anyhow::Result;
use osel_config::{SelectorConfig, SelectorStrategy, validate_config};
use osel_core::PerfScore;
use tracing::info;

use crate::algorithm::{PreferenceAlgorithm, SelectionAlgorithm};
use crate::min_ls::MinLsSelector;
use crate::selector::{OrderedSelector, Selector};
use crate::stake_reader::StakeReader;

/// Collaborators handed to the selector being built.
#[derive(Default, Clone)]
pub struct SelectorDeps {
    pub stake_reader: Option<Arc<dyn StakeReader>>,
    /// Exploration policy; [`PreferenceAlgorithm`] when unset.
    pub algorithm: Option<Arc<dyn SelectionAlgorithm>>,
    pub perf_score: Option<Arc<PerfScore>>,
}

/// Validate `config` and construct the selector it names.
pub fn build_selector(config: &SelectorConfig, deps: SelectorDeps) -> Result<Arc<dyn Selector>> {
    validate_config(config)?;

    let selector: Arc<dyn Selector> = match config.strategy {
        SelectorStrategy::InitialLatency => Arc::new(OrderedSelector::new()),
        SelectorStrategy::LatencyScore => Arc::new(OrderedSelector::order_by_latency_score()),
        SelectorStrategy::MinLatencyScore => {
            let algorithm: Arc<dyn SelectionAlgorithm> = match deps.algorithm {
                Some(algorithm) => algorithm,
                None => Arc::new(PreferenceAlgorithm),
            };
            Arc::new(MinLsSelector::new(
                deps.stake_reader,
                config.min_ls_threshold,
                algorithm,
                deps.perf_score,
                config.max_price_rat(),
            ))
        }
    };

    info!(
        strategy = ?config.strategy,
        min_ls_threshold = config.min_ls_threshold,
        max_price = ?config.max_price,
        "Built session selector"
    );
    Ok(selector)
}
