//! Adaptive two-tier selector keyed on a latency-score threshold.
//!
//! Sessions start in the *unknown* pool. Once a session has been used and
//! completed it moves to the *known* min-heap, ordered by its latency score
//! (lower is better). `select` reuses the best known session while it is
//! good enough (score strictly below `min_ls`) and otherwise explores the
//! unknown pool through the configured [`SelectionAlgorithm`]. A known
//! session that is not good enough is only reused once nothing unexplored
//! remains.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use osel_core::{EthAddress, PerfScore, PriceRat, SelectError, SessionHandle};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::algorithm::{SelectionAlgorithm, SelectionInput};
use crate::heap::SessionHeap;
use crate::selector::Selector;
use crate::stake_reader::StakeReader;

struct MinLsState {
    /// Never-measured sessions in arrival order.
    unknown: Vec<SessionHandle>,
    /// Sessions that completed at least one use, by latency score.
    known: SessionHeap<SessionHandle>,
    stake_reader: Option<Arc<dyn StakeReader>>,
}

pub struct MinLsSelector {
    min_ls: f64,
    algorithm: Arc<dyn SelectionAlgorithm>,
    perf_score: Option<Arc<PerfScore>>,
    max_price: Option<PriceRat>,
    state: Mutex<MinLsState>,
}

impl MinLsSelector {
    pub fn new(
        stake_reader: Option<Arc<dyn StakeReader>>,
        min_ls: f64,
        algorithm: Arc<dyn SelectionAlgorithm>,
        perf_score: Option<Arc<PerfScore>>,
        max_price: Option<PriceRat>,
    ) -> Self {
        Self {
            min_ls,
            algorithm,
            perf_score,
            max_price,
            state: Mutex::new(MinLsState {
                unknown: Vec::new(),
                known: SessionHeap::new(),
                stake_reader,
            }),
        }
    }

    pub async fn unknown_len(&self) -> usize {
        self.state.lock().await.unknown.len()
    }

    pub async fn known_len(&self) -> usize {
        self.state.lock().await.known.len()
    }

    /// Pick one unknown session via the selection algorithm and take it out
    /// of the unknown pool. The pool is left untouched on error.
    async fn select_unknown_session(
        &self,
        state: &mut MinLsState,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionHandle>, SelectError> {
        if state.unknown.is_empty() {
            return Ok(None);
        }

        // Index i of addrs always corresponds to index i of unknown.
        let addrs: Vec<EthAddress> = state
            .unknown
            .iter()
            .map(|sess| sess.recipient_address())
            .collect();

        let stakes = match state.stake_reader.clone() {
            Some(reader) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!("Selection cancelled during stake lookup");
                        return Err(SelectError::Cancelled);
                    }
                    result = reader.stakes(&addrs) => result.map_err(|e| {
                        warn!(error = %e, candidates = addrs.len(), "Stake lookup failed");
                        SelectError::stake_lookup(e)
                    })?,
                }
            }
            None => HashMap::new(),
        };

        let mut prices = HashMap::new();
        for (sess, addr) in state.unknown.iter().zip(&addrs) {
            let Some(info) = sess.price_info() else {
                continue;
            };
            match info.to_rat() {
                Some(price) => {
                    prices.insert(*addr, price);
                }
                None => warn!(
                    session = %sess.pm_session_id,
                    price_per_unit = info.price_per_unit,
                    pixels_per_unit = info.pixels_per_unit,
                    "Ignoring session price with non-positive pixels per unit"
                ),
            }
        }

        let perf_scores = self
            .perf_score
            .as_ref()
            .map(|perf| perf.snapshot_for(&addrs))
            .unwrap_or_default();

        let input = SelectionInput {
            addresses: &addrs,
            stakes: &stakes,
            max_price: self.max_price.as_ref(),
            prices: &prices,
            perf_scores: &perf_scores,
        };
        let chosen = self.algorithm.select(cancel, &input);

        let Some(idx) = addrs.iter().position(|addr| *addr == chosen) else {
            error!(
                address = %chosen,
                candidates = addrs.len(),
                "Selection algorithm returned an address outside the candidate list"
            );
            return Err(SelectError::NoMatchingCandidate { address: chosen });
        };

        let sess = remove_unknown_session(&mut state.unknown, idx);
        debug!(
            session = %sess.pm_session_id,
            address = %chosen,
            unknown = state.unknown.len(),
            known = state.known.len(),
            "Selected unknown session"
        );
        Ok(Some(sess))
    }
}

/// Order-preserving removal; the remaining sessions keep their relative order.
fn remove_unknown_session(unknown: &mut Vec<SessionHandle>, idx: usize) -> SessionHandle {
    unknown.remove(idx)
}

#[async_trait]
impl Selector for MinLsSelector {
    async fn add(&self, sessions: Vec<SessionHandle>) {
        let mut state = self.state.lock().await;
        state.unknown.extend(sessions);
    }

    async fn complete(&self, session: SessionHandle) {
        let mut state = self.state.lock().await;
        state.known.push(session);
    }

    async fn select(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionHandle>, SelectError> {
        let mut state = self.state.lock().await;

        let exploit = match state.known.peek_score() {
            Some(best) => state.unknown.is_empty() || best < self.min_ls,
            None => false,
        };
        if exploit {
            let sess = state.known.pop();
            if let Some(sess) = &sess {
                debug!(
                    session = %sess.pm_session_id,
                    latency_score = sess.latency_score(),
                    min_ls = self.min_ls,
                    "Selected known session"
                );
            }
            return Ok(sess);
        }

        self.select_unknown_session(&mut state, cancel).await
    }

    async fn remove(&self, session: &SessionHandle) {
        let mut state = self.state.lock().await;
        if let Some(idx) = state.unknown.iter().position(|s| Arc::ptr_eq(s, session)) {
            remove_unknown_session(&mut state.unknown, idx);
            return;
        }
        if state.known.retain(|s| !Arc::ptr_eq(s, session)) == 0 {
            debug!(
                session = %session.pm_session_id,
                "Remove ignored: session is not pooled"
            );
        }
    }

    async fn size(&self) -> usize {
        let state = self.state.lock().await;
        state.unknown.len() + state.known.len()
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.unknown = Vec::new();
        state.known.clear();
        state.stake_reader = None;
    }
}

#[cfg(test)]
#[path = "min_ls_tests.rs"]
mod tests;
