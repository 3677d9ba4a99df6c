//! Binary min-heap keyed by a floating point score.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use osel_core::BroadcastSession;

/// Anything that can be ordered by a score where lower is better.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for BroadcastSession {
    fn score(&self) -> f64 {
        self.latency_score()
    }
}

impl<T: Scored + ?Sized> Scored for Arc<T> {
    fn score(&self) -> f64 {
        (**self).score()
    }
}

/// Heap slot. The score is captured on push so later mutation of the item
/// cannot break the heap property.
struct Entry<T> {
    score: f64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

/// Min-heap by [`Scored::score`]. Ties come out in unspecified order.
pub struct SessionHeap<T> {
    entries: BinaryHeap<Entry<T>>,
}

impl<T: Scored> SessionHeap<T> {
    pub fn new() -> Self {
        Self {
            entries: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        let score = item.score();
        self.entries.push(Entry { score, item });
    }

    /// Remove and return the lowest-scored item, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop().map(|entry| entry.item)
    }

    /// Lowest-scored item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.entries.peek().map(|entry| &entry.item)
    }

    /// Score the current minimum was pushed with.
    pub fn peek_score(&self) -> Option<f64> {
        self.entries.peek().map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only items matching `keep`; returns how many were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| keep(&entry.item));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Scored> Default for SessionHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SessionHeap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHeap")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osel_core::SessionHandle;

    fn scored(score: f64) -> SessionHandle {
        Arc::new(BroadcastSession::new(format!("sess-{score}")).with_latency_score(score))
    }

    #[test]
    fn test_empty_heap_returns_none() {
        let mut heap: SessionHeap<SessionHandle> = SessionHeap::new();
        assert_eq!(heap.len(), 0);
        assert!(heap.peek().is_none());
        assert!(heap.pop().is_none());
    }

    #[test]
    fn test_heap_orders_by_lowest_score() {
        let mut heap = SessionHeap::new();

        let sess1 = scored(1.0);
        heap.push(Arc::clone(&sess1));
        assert_eq!(heap.len(), 1);
        assert!(Arc::ptr_eq(heap.peek().unwrap(), &sess1));

        let sess2 = scored(1.1);
        heap.push(Arc::clone(&sess2));
        assert_eq!(heap.len(), 2);
        assert!(Arc::ptr_eq(heap.peek().unwrap(), &sess1));

        let sess3 = scored(0.9);
        heap.push(Arc::clone(&sess3));
        assert_eq!(heap.len(), 3);
        assert!(Arc::ptr_eq(heap.peek().unwrap(), &sess3));
        assert_eq!(heap.peek_score(), Some(0.9));

        assert!(Arc::ptr_eq(&heap.pop().unwrap(), &sess3));
        assert!(Arc::ptr_eq(&heap.pop().unwrap(), &sess1));
        assert!(Arc::ptr_eq(&heap.pop().unwrap(), &sess2));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_score_captured_at_push() {
        let mut heap = SessionHeap::new();
        let low = scored(0.5);
        let high = scored(2.0);
        heap.push(Arc::clone(&low));
        heap.push(Arc::clone(&high));

        // Mutating after push does not reorder the heap.
        low.set_latency_score(5.0);
        assert!(Arc::ptr_eq(heap.peek().unwrap(), &low));
        assert_eq!(heap.peek_score(), Some(0.5));
    }

    #[test]
    fn test_retain_removes_by_identity() {
        let mut heap = SessionHeap::new();
        let a = scored(1.0);
        let b = scored(1.0);
        heap.push(Arc::clone(&a));
        heap.push(Arc::clone(&b));

        assert_eq!(heap.retain(|s| !Arc::ptr_eq(s, &a)), 1);
        assert_eq!(heap.len(), 1);
        assert!(Arc::ptr_eq(heap.peek().unwrap(), &b));
        assert_eq!(heap.retain(|s| !Arc::ptr_eq(s, &a)), 0);

        heap.clear();
        assert!(heap.is_empty());
    }
}
