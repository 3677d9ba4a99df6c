//! Broadcast session handles and the performance-score snapshot.
//!
//! A [`BroadcastSession`] is built by the session layer once an orchestrator
//! has been discovered and is handed to a selector behind an `Arc`. Pool
//! membership, completion and removal all work on pointer identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{EthAddress, PriceInfo, PriceRat};

/// Shared handle to a session; identity is `Arc::ptr_eq`.
pub type SessionHandle = Arc<BroadcastSession>;

/// Payment parameters advertised by an orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketParams {
    /// Raw recipient address bytes.
    pub recipient: Vec<u8>,
}

/// Routing and payment metadata returned by an orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorInfo {
    pub transcoder: String,
    #[serde(default)]
    pub ticket_params: Option<TicketParams>,
    #[serde(default)]
    pub price_info: Option<PriceInfo>,
}

/// Per-stream parameters of the work the session is used for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParameters {
    pub manifest_id: String,
}

/// One usable connection to a candidate orchestrator.
#[derive(Debug, Default)]
pub struct BroadcastSession {
    pub pm_session_id: String,
    /// Latency estimate announced at discovery time.
    pub initial_latency: Duration,
    pub orchestrator_info: Option<OrchestratorInfo>,
    pub params: Option<StreamParameters>,
    /// Measured latency score as f64 bits. Lower is better.
    latency_score: AtomicU64,
}

impl BroadcastSession {
    pub fn new(pm_session_id: impl Into<String>) -> Self {
        Self {
            pm_session_id: pm_session_id.into(),
            ..Default::default()
        }
    }

    pub fn with_initial_latency(mut self, latency: Duration) -> Self {
        self.initial_latency = latency;
        self
    }

    pub fn with_latency_score(self, score: f64) -> Self {
        self.set_latency_score(score);
        self
    }

    pub fn with_orchestrator_info(mut self, info: OrchestratorInfo) -> Self {
        self.orchestrator_info = Some(info);
        self
    }

    pub fn with_params(mut self, params: StreamParameters) -> Self {
        self.params = Some(params);
        self
    }

    /// Current measured latency score.
    pub fn latency_score(&self) -> f64 {
        f64::from_bits(self.latency_score.load(Ordering::Acquire))
    }

    /// Record a new measured latency score. Callers update the score of a
    /// checked-out session before handing it back via `complete`.
    pub fn set_latency_score(&self, score: f64) {
        self.latency_score.store(score.to_bits(), Ordering::Release);
    }

    /// Recipient address from the ticket parameters, or the zero address
    /// when the orchestrator supplied none.
    pub fn recipient_address(&self) -> EthAddress {
        self.orchestrator_info
            .as_ref()
            .and_then(|info| info.ticket_params.as_ref())
            .map(|params| EthAddress::from_slice(&params.recipient))
            .unwrap_or(EthAddress::ZERO)
    }

    pub fn price_info(&self) -> Option<&PriceInfo> {
        self.orchestrator_info
            .as_ref()
            .and_then(|info| info.price_info.as_ref())
    }

    /// Rational price, if one was attached and is well formed.
    pub fn price(&self) -> Option<PriceRat> {
        self.price_info().and_then(PriceInfo::to_rat)
    }

    pub fn manifest_id(&self) -> Option<&str> {
        self.params.as_ref().map(|p| p.manifest_id.as_str())
    }
}

/// Address-keyed performance scores published by an external scorer.
///
/// Higher is better. The selector only ever reads snapshots.
#[derive(Debug, Default)]
pub struct PerfScore {
    scores: RwLock<HashMap<EthAddress, f64>>,
}

impl PerfScore {
    pub fn new(scores: HashMap<EthAddress, f64>) -> Self {
        Self {
            scores: RwLock::new(scores),
        }
    }

    /// Replace all scores at once.
    pub fn update(&self, scores: HashMap<EthAddress, f64>) {
        match self.scores.write() {
            Ok(mut guard) => *guard = scores,
            Err(poisoned) => *poisoned.into_inner() = scores,
        }
    }

    /// Scores for `addrs` that have an entry. Addresses without a score are
    /// omitted rather than defaulted.
    pub fn snapshot_for(&self, addrs: &[EthAddress]) -> HashMap<EthAddress, f64> {
        let guard = match self.scores.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        addrs
            .iter()
            .filter_map(|addr| guard.get(addr).map(|score| (*addr, *score)))
            .collect()
    }

    pub fn len(&self) -> usize {
        match self.scores.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
