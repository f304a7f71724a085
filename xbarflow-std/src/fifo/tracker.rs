//! FIFO Tracker.

use crate::Counter;

/// Read/write pointer bookkeeping of a FIFO with `slots` entries.
///
/// Equal pointers are disambiguated by the last operation: after an enqueue they mean full,
/// after a dequeue they mean empty.
#[derive(Debug, Clone)]
pub struct FifoTracker {
    wptr: Counter,
    rptr: Counter,
    last_enq: bool,
    last_deq: bool,
}

impl FifoTracker {
    /// Creates an empty tracker.
    pub fn new(slots: usize) -> Self {
        Self { wptr: Counter::new(slots), rptr: Counter::new(slots), last_enq: false, last_deq: true }
    }

    /// Number of slots.
    pub fn slots(&self) -> usize { self.wptr.modulo() }

    /// Write pointer.
    pub fn wptr(&self) -> usize { self.wptr.value() }

    /// Read pointer.
    pub fn rptr(&self) -> usize { self.rptr.value() }

    /// Full flag.
    pub fn full(&self) -> bool { self.wptr == self.rptr && self.last_enq }

    /// Empty flag.
    pub fn empty(&self) -> bool { self.wptr == self.rptr && self.last_deq }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        if self.full() {
            self.slots()
        } else {
            (self.wptr() + self.slots() - self.rptr()) % self.slots()
        }
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool { self.empty() }

    /// Commits one cycle of enqueue/dequeue requests.
    pub fn step(&mut self, enq: bool, deq: bool) {
        debug_assert!(!(enq && self.full() && !deq), "enqueue into a full FIFO");
        debug_assert!(!(deq && self.empty()), "dequeue from an empty FIFO");
        let _ = self.wptr.incr(enq);
        let _ = self.rptr.incr(deq);
        if enq || deq {
            self.last_enq = enq;
            self.last_deq = deq;
        }
    }
}
