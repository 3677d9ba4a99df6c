use crate::types::EthAddress;

/// Data-model parse and validation failures.
#[derive(thiserror::Error, Debug)]
pub enum OselError {
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Invalid price {num}/{den}: denominator must be positive")]
    InvalidPrice { num: i64, den: i64 },
}

/// Failures surfaced by `Selector::select`.
///
/// An empty pool is not an error; `select` returns `Ok(None)` for it.
#[derive(thiserror::Error, Debug)]
pub enum SelectError {
    #[error("Stake lookup failed: {0}")]
    StakeLookup(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Selection cancelled")]
    Cancelled,

    #[error("Selection algorithm returned {address}, which matches no unknown session")]
    NoMatchingCandidate { address: EthAddress },
}

impl SelectError {
    pub fn stake_lookup(err: anyhow::Error) -> Self {
        Self::StakeLookup(err.into())
    }
}
