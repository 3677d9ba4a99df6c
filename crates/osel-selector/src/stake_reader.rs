//! Stake lookups backed by the orchestrator store.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use osel_core::EthAddress;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reads the bonded stake of a set of orchestrators.
///
/// Addresses the backing store has no record for may be omitted from the
/// result. Query failures are returned as errors.
#[async_trait]
pub trait StakeReader: Send + Sync {
    async fn stakes(&self, addrs: &[EthAddress]) -> Result<HashMap<EthAddress, i64>>;
}

/// Orchestrator record as persisted by the discovery layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbOrch {
    pub ethereum_addr: String,
    #[serde(default)]
    pub service_uri: String,
    #[serde(default)]
    pub stake: i64,
}

/// Filter for [`OrchestratorStore::select_orchs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbOrchFilter {
    pub addresses: Vec<EthAddress>,
}

/// Persistent orchestrator store.
#[async_trait]
pub trait OrchestratorStore: Send + Sync {
    async fn select_orchs(&self, filter: &DbOrchFilter) -> Result<Vec<DbOrch>>;
}

/// [`StakeReader`] that issues one filtered store query per lookup.
#[derive(Debug, Clone)]
pub struct StoreStakeReader<S> {
    store: S,
}

impl<S> StoreStakeReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: OrchestratorStore> StakeReader for StoreStakeReader<S> {
    async fn stakes(&self, addrs: &[EthAddress]) -> Result<HashMap<EthAddress, i64>> {
        let filter = DbOrchFilter {
            addresses: addrs.to_vec(),
        };
        let orchs = self.store.select_orchs(&filter).await?;

        // Every returned record is kept; malformed addresses decode leniently.
        let stakes: HashMap<EthAddress, i64> = orchs
            .iter()
            .map(|orch| (EthAddress::from_hex_lenient(&orch.ethereum_addr), orch.stake))
            .collect();
        debug!(
            requested = addrs.len(),
            resolved = stakes.len(),
            "Resolved orchestrator stakes"
        );
        Ok(stakes)
    }
}
