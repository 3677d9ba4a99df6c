//! Orchestrator session selection: ordered-pool selectors, the adaptive
//! min-latency-score selector, stake lookups and exploration policies.

pub mod algorithm;
pub mod factory;
pub mod heap;
pub mod min_ls;
pub mod selector;
pub mod stake_reader;

pub use algorithm::{PreferenceAlgorithm, SelectionAlgorithm, SelectionInput};
pub use factory::{SelectorDeps, build_selector};
pub use heap::{Scored, SessionHeap};
pub use min_ls::MinLsSelector;
pub use selector::{OrderedSelector, Selector, SortKey};
pub use stake_reader::{DbOrch, DbOrchFilter, OrchestratorStore, StakeReader, StoreStakeReader};
