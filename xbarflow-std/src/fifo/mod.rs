//! FIFO.

mod tracker;

pub use tracker::FifoTracker;

/// Bounded FIFO of `depth` entries.
///
/// Callers decide enqueue/dequeue from the start-of-cycle occupancy ([`Fifo::can_enq`],
/// [`Fifo::can_deq`]), so a full FIFO never accepts in the cycle it is drained.
#[derive(Debug, Clone)]
pub struct Fifo<V> {
    mem: Vec<Option<V>>,
    tracker: FifoTracker,
}

impl<V> Fifo<V> {
    /// Creates an empty FIFO.
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0, "FIFO depth must be nonzero");
        Self { mem: (0..depth).map(|_| None).collect(), tracker: FifoTracker::new(depth) }
    }

    /// Depth.
    pub fn capacity(&self) -> usize { self.mem.len() }

    /// Occupancy.
    pub fn len(&self) -> usize { self.tracker.len() }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool { self.tracker.empty() }

    /// Returns `true` if an enqueue would be accepted.
    pub fn can_enq(&self) -> bool { !self.tracker.full() }

    /// Returns `true` if a dequeue would produce a value.
    pub fn can_deq(&self) -> bool { !self.tracker.empty() }

    /// Head of the FIFO.
    pub fn peek(&self) -> Option<&V> {
        if self.tracker.empty() {
            None
        } else {
            self.mem[self.tracker.rptr()].as_ref()
        }
    }

    /// Enqueues a value. Returns it back when full.
    pub fn enq(&mut self, value: V) -> Result<(), V> {
        if self.tracker.full() {
            return Err(value);
        }
        self.mem[self.tracker.wptr()] = Some(value);
        self.tracker.step(true, false);
        Ok(())
    }

    /// Dequeues the head.
    pub fn deq(&mut self) -> Option<V> {
        if self.tracker.empty() {
            return None;
        }
        let value = self.mem[self.tracker.rptr()].take();
        self.tracker.step(false, true);
        value
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        let rptr = self.tracker.rptr();
        let depth = self.capacity();
        (0..self.len()).filter_map(move |i| self.mem[(rptr + i) % depth].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn refuses_when_full() {
        let mut f = Fifo::new(2);
        assert_eq!(f.enq(1), Ok(()));
        assert_eq!(f.enq(2), Ok(()));
        assert_eq!(f.enq(3), Err(3));
        assert_eq!(f.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(f.deq(), Some(1));
        assert_eq!(f.peek(), Some(&2));
    }

    proptest! {
        #[test]
        fn behaves_like_a_bounded_queue(depth in 1usize..6, ops in prop::collection::vec(any::<Option<u8>>(), 0..64)) {
            let mut fifo = Fifo::new(depth);
            let mut model = VecDeque::new();
            for op in ops {
                match op {
                    Some(v) => {
                        let accepted = fifo.enq(v).is_ok();
                        prop_assert_eq!(accepted, model.len() < depth);
                        if accepted {
                            model.push_back(v);
                        }
                    }
                    None => prop_assert_eq!(fifo.deq(), model.pop_front()),
                }
                prop_assert_eq!(fifo.len(), model.len());
                prop_assert_eq!(fifo.peek(), model.front());
            }
        }
    }
}
