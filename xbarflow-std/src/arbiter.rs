//! Round-robin arbiter.

use crate::one_hot::{index_to_one_hot, one_hot_to_index};

/// Round-robin arbiter over `ports` requesters.
///
/// The priority register is one-hot. Among the requesters, the one holding priority wins; if it
/// is not requesting, priority falls through to the next requester in rotation order. After a
/// decision is acknowledged the priority moves to the port right after the winner, so under
/// contention from `k` requesters each wins once every `k` decisions.
#[derive(Debug, Clone)]
pub struct RrArbiter {
    priority: Vec<bool>,
}

impl RrArbiter {
    /// Creates an arbiter with priority on port 0.
    pub fn new(ports: usize) -> Self {
        assert!(ports > 0, "arbiter needs at least one port");
        Self { priority: index_to_one_hot(ports, 0) }
    }

    /// Number of ports.
    pub fn ports(&self) -> usize { self.priority.len() }

    /// Index of the prioritized port.
    pub fn priority_index(&self) -> usize {
        match one_hot_to_index(&self.priority) {
            Some(index) => index,
            None => panic!("internal error: empty priority register"),
        }
    }

    /// Returns the port granted for `requests`, without changing state.
    pub fn grant(&self, requests: &[bool]) -> Option<usize> {
        assert_eq!(requests.len(), self.ports(), "request vector width mismatch");
        let start = self.priority_index();
        (0..self.ports()).map(|offset| (start + offset) % self.ports()).find(|&port| requests[port])
    }

    /// Commits a decision won by `winner`.
    pub fn ack(&mut self, winner: usize) {
        assert!(winner < self.ports(), "winner {} out of {} ports", winner, self.ports());
        self.priority = index_to_one_hot(self.ports(), (winner + 1) % self.ports());
    }
}
