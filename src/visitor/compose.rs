//! Visitor decorators.

use super::{Match, MatchVisitor};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Visitor that ignores every match
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl MatchVisitor for Discard {
    fn matched(&self, _m: &Match<'_>) {}
}

/// Forwards every match with its two sides swapped
#[derive(Debug, Clone, Default)]
pub struct InvertVisitor<V> {
    next: V,
}

impl<V: MatchVisitor> InvertVisitor<V> {
    pub fn new(next: V) -> Self {
        Self { next }
    }

    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: MatchVisitor> MatchVisitor for InvertVisitor<V> {
    fn matched(&self, m: &Match<'_>) {
        self.next.matched(&m.inverted());
    }
}

/// Counts matches, then forwards them unchanged.
///
/// The counter is atomic, so one instance can be shared by all workers of
/// the sharded matcher.
#[derive(Debug, Default)]
pub struct CountVisitor<V = Discard> {
    count: AtomicUsize,
    next: V,
}

impl CountVisitor<Discard> {
    pub fn new() -> Self {
        Self::wrap(Discard)
    }
}

impl<V: MatchVisitor> CountVisitor<V> {
    pub fn wrap(next: V) -> Self {
        Self {
            count: AtomicUsize::new(0),
            next,
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    pub fn inner(&self) -> &V {
        &self.next
    }
}

impl<V: MatchVisitor> MatchVisitor for CountVisitor<V> {
    fn matched(&self, m: &Match<'_>) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.next.matched(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolSequence;
    use crate::visitor::{CollectVisitor, Side};

    fn sample_match<'a>(a: &'a SymbolSequence, b: &'a SymbolSequence) -> Match<'a> {
        Match::new(Side::new(a, 0, 2), Side::new(b, 1, 2))
    }

    #[test]
    fn test_count_visitor() {
        let a = SymbolSequence::new("a", vec![1, 2]);
        let b = SymbolSequence::new("b", vec![0, 1, 2]);
        let counter = CountVisitor::new();

        for _ in 0..5 {
            counter.matched(&sample_match(&a, &b));
        }
        assert_eq!(counter.count(), 5);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_count_forwards_unchanged() {
        let a = SymbolSequence::new("a", vec![1, 2]);
        let b = SymbolSequence::new("b", vec![0, 1, 2]);
        let counter = CountVisitor::wrap(CollectVisitor::new());

        counter.matched(&sample_match(&a, &b));

        let records = counter.inner().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text_a, "a");
        assert_eq!(records[0].offset_b, 1);
    }

    #[test]
    fn test_invert_visitor() {
        let a = SymbolSequence::new("a", vec![1, 2]);
        let b = SymbolSequence::new("b", vec![0, 1, 2]);
        let invert = InvertVisitor::new(CollectVisitor::new());

        invert.matched(&sample_match(&a, &b));

        let records = invert.into_inner().into_records();
        assert_eq!(records[0].text_a, "b");
        assert_eq!(records[0].offset_a, 1);
        assert_eq!(records[0].text_b, "a");
        assert_eq!(records[0].offset_b, 0);
    }

    #[test]
    fn test_count_shared_across_threads() {
        let a = SymbolSequence::new("a", vec![1, 2]);
        let b = SymbolSequence::new("b", vec![0, 1, 2]);
        let counter = CountVisitor::new();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        counter.matched(&sample_match(&a, &b));
                    }
                });
            }
        });

        assert_eq!(counter.count(), 400);
    }
}
