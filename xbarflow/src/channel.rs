//! Valid-ready channels.

/// Valid-ready channel.
///
/// The producer offers a payload (valid), the consumer asserts ready, and the payload moves
/// iff both hold in the same cycle. There is no cancel: once offered, a payload stays offered
/// unchanged until the consumer takes it.
///
/// A channel sits on a module boundary and is used in one of two ways:
///
/// - inbound (the module consumes): the environment calls [`VrChannel::offer`], the module
///   inspects [`VrChannel::peek`] and calls [`VrChannel::accept`] when it decides to take it.
/// - outbound (the module produces): the environment calls [`VrChannel::set_ready`] before the
///   cycle, the module calls [`VrChannel::push`] and the environment collects the payload with
///   [`VrChannel::take`] after the cycle.
#[derive(Debug, Clone)]
pub struct VrChannel<V> {
    /// Offered payload.
    fwd: Option<V>,
    /// Ready bit.
    ready: bool,
    /// Payload transferred in the most recent cycle, not yet collected.
    delivered: Option<V>,
    /// Statically disabled channel.
    tied_off: bool,
}

impl<V> Default for VrChannel<V> {
    fn default() -> Self { Self { fwd: None, ready: false, delivered: None, tied_off: false } }
}

impl<V> VrChannel<V> {
    /// Creates an idle channel.
    pub fn new() -> Self { Self::default() }

    /// Creates a channel that is statically disabled: offers are refused and it is never ready.
    pub fn tied_off() -> Self { Self { tied_off: true, ..Self::default() } }

    /// Returns `true` if the channel is statically disabled.
    pub fn is_tied_off(&self) -> bool { self.tied_off }

    /// Offers a payload. Returns it back if another payload is still pending or the channel is
    /// tied off.
    pub fn offer(&mut self, value: V) -> Result<(), V> {
        if self.tied_off || self.fwd.is_some() {
            return Err(value);
        }
        self.fwd = Some(value);
        Ok(())
    }

    /// Valid bit.
    pub fn is_valid(&self) -> bool { self.fwd.is_some() }

    /// Returns the offered payload.
    pub fn peek(&self) -> Option<&V> { self.fwd.as_ref() }

    /// Consumes the offered payload.
    pub fn accept(&mut self) -> Option<V> { self.fwd.take() }

    /// Sets the ready bit. Ignored on a tied-off channel.
    pub fn set_ready(&mut self, ready: bool) { self.ready = ready && !self.tied_off; }

    /// Ready bit.
    pub fn is_ready(&self) -> bool { self.ready }

    /// Returns `true` if a payload pushed now would be transferred.
    pub fn can_push(&self) -> bool { self.ready && self.delivered.is_none() }

    /// Transfers a payload to the consumer. Returns it back if the consumer is not ready or has
    /// not collected the previous one.
    pub fn push(&mut self, value: V) -> Result<(), V> {
        if !self.can_push() {
            return Err(value);
        }
        self.delivered = Some(value);
        Ok(())
    }

    /// Collects the transferred payload.
    pub fn take(&mut self) -> Option<V> { self.delivered.take() }

    /// Returns `true` if nothing is offered and nothing is waiting to be collected.
    pub fn is_idle(&self) -> bool { self.fwd.is_none() && self.delivered.is_none() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_is_sticky_until_accepted() {
        let mut ch = VrChannel::new();
        assert_eq!(ch.offer(1), Ok(()));
        assert_eq!(ch.offer(2), Err(2));
        assert_eq!(ch.peek(), Some(&1));
        assert_eq!(ch.accept(), Some(1));
        assert!(!ch.is_valid());
        assert_eq!(ch.offer(2), Ok(()));
    }

    #[test]
    fn push_needs_ready_and_collection() {
        let mut ch = VrChannel::new();
        assert_eq!(ch.push(1), Err(1));
        ch.set_ready(true);
        assert_eq!(ch.push(1), Ok(()));
        assert_eq!(ch.push(2), Err(2));
        assert_eq!(ch.take(), Some(1));
        assert_eq!(ch.push(2), Ok(()));
    }

    #[test]
    fn tied_off_refuses_everything() {
        let mut ch = VrChannel::tied_off();
        assert_eq!(ch.offer(1), Err(1));
        ch.set_ready(true);
        assert!(!ch.is_ready());
        assert_eq!(ch.push(1), Err(1));
        assert!(ch.is_idle());
    }
}
