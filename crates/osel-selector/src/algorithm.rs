//! Pluggable exploration policy used to pick among unknown sessions.

use std::collections::HashMap;

use osel_core::{EthAddress, PriceRat};
use tokio_util::sync::CancellationToken;

/// Signals gathered for the unknown sessions of one selection round.
///
/// `addresses` keeps the unknown-pool order and may contain duplicates or
/// zero addresses. The maps only hold entries for addresses that have data.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub addresses: &'a [EthAddress],
    pub stakes: &'a HashMap<EthAddress, i64>,
    pub max_price: Option<&'a PriceRat>,
    pub prices: &'a HashMap<EthAddress, PriceRat>,
    pub perf_scores: &'a HashMap<EthAddress, f64>,
}

/// Chooses one orchestrator address out of a candidate list.
///
/// Implementations must return an element of `input.addresses` whenever it
/// is non-empty, even when every signal map is empty.
pub trait SelectionAlgorithm: Send + Sync {
    fn select(&self, cancel: &CancellationToken, input: &SelectionInput<'_>) -> EthAddress;
}

/// Deterministic preference order: lowest price, then highest performance
/// score, then highest stake, then the first candidate.
///
/// Candidates priced above `max_price` are dropped first unless that would
/// leave nothing to choose from. Ties keep the earliest candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreferenceAlgorithm;

impl SelectionAlgorithm for PreferenceAlgorithm {
    fn select(&self, _cancel: &CancellationToken, input: &SelectionInput<'_>) -> EthAddress {
        let Some(first) = input.addresses.first().copied() else {
            return EthAddress::ZERO;
        };

        let affordable: Vec<EthAddress> = match input.max_price {
            Some(max) => input
                .addresses
                .iter()
                .copied()
                .filter(|addr| input.prices.get(addr).is_none_or(|price| price <= max))
                .collect(),
            None => input.addresses.to_vec(),
        };
        let candidates = if affordable.is_empty() {
            input.addresses
        } else {
            affordable.as_slice()
        };

        if let Some(addr) = best_by(candidates, |addr| input.prices.get(addr), |a, b| a < b) {
            return addr;
        }
        if let Some(addr) = best_by(candidates, |addr| input.perf_scores.get(addr), |a, b| a > b) {
            return addr;
        }
        if let Some(addr) = best_by(candidates, |addr| input.stakes.get(addr), |a, b| a > b) {
            return addr;
        }
        candidates.first().copied().unwrap_or(first)
    }
}

/// Earliest candidate whose signal is strictly better than every earlier
/// one. Candidates without a signal are skipped.
fn best_by<'m, V, G, B>(candidates: &[EthAddress], get: G, better: B) -> Option<EthAddress>
where
    V: 'm,
    G: Fn(&EthAddress) -> Option<&'m V>,
    B: Fn(&V, &V) -> bool,
{
    let mut best: Option<(EthAddress, &'m V)> = None;
    for addr in candidates {
        let Some(value) = get(addr) else {
            continue;
        };
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((*addr, value)),
        }
    }
    best.map(|(addr, _)| addr)
}
