//! Counter modules.

/// Circular pointer over `0..modulo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: usize,
    modulo: usize,
}

impl Counter {
    /// Creates a counter at 0.
    pub fn new(modulo: usize) -> Self {
        assert!(modulo > 0, "counter must have at least one state");
        Self { value: 0, modulo }
    }

    /// Current counter value.
    pub fn value(&self) -> usize { self.value }

    /// Value after one increment.
    pub fn next(&self) -> usize {
        let next = self.value + 1;
        if next >= self.modulo {
            0
        } else {
            next
        }
    }

    /// Number of states.
    pub fn modulo(&self) -> usize { self.modulo }

    /// Increments the counter if `en` holds.
    ///
    /// It returns the pair of current counter value and next counter value.
    pub fn incr(&mut self, en: bool) -> (usize, usize) {
        let current = self.value;
        if en {
            self.value = self.next();
        }
        (current, self.value)
    }
}
