//! Selector contract and the ordered-pool selector.
//!
//! A selector owns a pool of [`SessionHandle`]s. Callers `select` a session
//! for each unit of work, then hand it back with `complete` (after updating
//! its latency score) or drop it from the pool with `remove`.

use async_trait::async_trait;
use osel_core::{SelectError, SessionHandle};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Pool of sessions handed out one at a time.
///
/// Each implementation serializes all operations behind one lock. `select`
/// never waits for sessions to be added: an empty pool yields `Ok(None)`.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Add newly discovered sessions to the pool.
    async fn add(&self, sessions: Vec<SessionHandle>);
    /// Return a checked-out session to the pool.
    async fn complete(&self, session: SessionHandle);
    /// Check out the next session to use.
    async fn select(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionHandle>, SelectError>;
    /// Drop a session from the pool. No-op when it is not pooled.
    async fn remove(&self, session: &SessionHandle);
    /// Number of pooled (not checked-out) sessions.
    async fn size(&self) -> usize;
    /// Drop every pooled session.
    async fn clear(&self);
}

/// Metric an [`OrderedSelector`] sorts its pool by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Latency announced when the orchestrator was discovered.
    InitialLatency,
    /// Latency score measured by the caller.
    LatencyScore,
}

/// Exploitation-only selector: always hands out the pooled session with
/// the lowest sort key.
#[derive(Debug)]
pub struct OrderedSelector {
    sort_key: SortKey,
    sessions: Mutex<Vec<SessionHandle>>,
}

impl OrderedSelector {
    /// Selector ordered by announced initial latency.
    pub fn new() -> Self {
        Self::with_sort_key(SortKey::InitialLatency)
    }

    /// Selector ordered by measured latency score.
    pub fn order_by_latency_score() -> Self {
        Self::with_sort_key(SortKey::LatencyScore)
    }

    pub fn with_sort_key(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Pooled sessions in selection order.
    pub async fn sessions(&self) -> Vec<SessionHandle> {
        self.sessions.lock().await.clone()
    }

    fn sort(&self, sessions: &mut [SessionHandle]) {
        match self.sort_key {
            SortKey::InitialLatency => sessions.sort_by_key(|s| s.initial_latency),
            SortKey::LatencyScore => {
                sessions.sort_by(|a, b| a.latency_score().total_cmp(&b.latency_score()))
            }
        }
    }
}

impl Default for OrderedSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Selector for OrderedSelector {
    async fn add(&self, sessions: Vec<SessionHandle>) {
        let mut pool = self.sessions.lock().await;
        pool.extend(sessions);
        self.sort(&mut pool);
    }

    async fn complete(&self, session: SessionHandle) {
        self.add(vec![session]).await;
    }

    async fn select(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Option<SessionHandle>, SelectError> {
        let mut pool = self.sessions.lock().await;
        if pool.is_empty() {
            return Ok(None);
        }
        let session = pool.remove(0);
        debug!(
            session = %session.pm_session_id,
            sort_key = ?self.sort_key,
            remaining = pool.len(),
            "Selected session from ordered pool"
        );
        Ok(Some(session))
    }

    async fn remove(&self, session: &SessionHandle) {
        let mut pool = self.sessions.lock().await;
        if let Some(idx) = pool.iter().position(|s| Arc::ptr_eq(s, session)) {
            pool.remove(idx);
        }
    }

    async fn size(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn clear(&self) {
        self.sessions.lock().await.clear();
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
