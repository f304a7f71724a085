//! Address-phase switch.
//!
//! Routes requests from N initiators to M targets. Each initiator's request is decoded against the targets it
//! can see; initiators contending for one target are arbitrated round-robin. Accepting a request moves it to
//! the target in the same cycle and reports a [`SelectionEvent`] so the order queues can record it.

use tracing::trace;
use xbarflow::{low_mask, some_or, VrChannel};
use xbarflow_std::RrArbiter;

use crate::layout::GroupLayout;
use crate::order::OrderTracker;
use crate::{Port, Request, TargetRange};

/// Comparator deciding whether an address falls in a target's range.
///
/// The address bits above the target size and below the bus width are compared against the target's prefix.
/// An address with any bit set above the bus width matches no target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrDecoder {
    mask: u64,
    prefix: u64,
    bus: u64,
}

impl AddrDecoder {
    /// Decoder for `range` on a bus of `addr_width` bits.
    pub fn new(range: &TargetRange, addr_width: u32) -> Self {
        let bus = low_mask(addr_width);
        let mask = range.mask() & bus;
        Self { mask, prefix: range.prefix() & mask, bus }
    }

    /// Returns `true` if `addr` hits the range.
    pub fn matches(&self, addr: u64) -> bool { addr & !self.bus == 0 && addr & self.mask == self.prefix }

    /// Number of address bits compared.
    pub fn compared_bits(&self) -> u32 { self.mask.count_ones() }
}

/// Request of `initiator` accepted for `target`, in group-local numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionEvent {
    /// Local initiator.
    pub initiator: usize,
    /// Local target.
    pub target: usize,
}

/// Address-phase N:M switch.
#[derive(Debug, Clone)]
pub struct AddrCrossbar {
    /// Indexed by `[initiator][target]`; `None` where the initiator cannot see the target.
    decoders: Vec<Vec<Option<AddrDecoder>>>,
    /// Potential initiators of each target, in rotation order.
    contenders: Vec<Vec<usize>>,
    /// Arbiter of each target with more than one potential initiator.
    arbiters: Vec<Option<RrArbiter>>,
    ranges: Vec<TargetRange>,
}

impl AddrCrossbar {
    /// Creates the switch of a group.
    pub fn new(layout: &GroupLayout, addr_width: u32) -> Self {
        let decoders = (0..layout.initiator_count())
            .map(|i| {
                (0..layout.target_count())
                    .map(|t| layout.targets_of(i).contains(&t).then(|| AddrDecoder::new(layout.range(t), addr_width)))
                    .collect()
            })
            .collect();
        let contenders = (0..layout.target_count()).map(|t| layout.initiators_of(t).iter().copied().collect::<Vec<_>>()).collect::<Vec<_>>();
        let arbiters = contenders.iter().map(|c| (c.len() > 1).then(|| RrArbiter::new(c.len()))).collect();
        let ranges = (0..layout.target_count()).map(|t| *layout.range(t)).collect();

        Self { decoders, contenders, arbiters, ranges }
    }

    /// Number of initiators.
    pub fn initiator_count(&self) -> usize { self.decoders.len() }

    /// Number of targets.
    pub fn target_count(&self) -> usize { self.contenders.len() }

    /// Arbiter of `target`, if it has more than one potential initiator.
    pub fn arbiter(&self, target: usize) -> Option<&RrArbiter> { self.arbiters[target].as_ref() }

    /// Target `initiator` reaches with `addr`.
    pub fn decode(&self, initiator: usize, addr: u64) -> Option<usize> {
        self.decoders[initiator].iter().position(|decoder| decoder.map_or(false, |d| d.matches(addr)))
    }

    /// Decides which requests are accepted this cycle.
    ///
    /// `requests` holds the address offered by each initiator. An initiator contends only if
    /// `initiator_open(initiator)`; a target accepts only if `target_open(target)`. At most one request is
    /// accepted per target and per initiator.
    pub fn arbitrate<I, T>(&self, requests: &[Option<u64>], initiator_open: I, target_open: T) -> Vec<SelectionEvent>
    where
        I: Fn(usize) -> bool,
        T: Fn(usize) -> bool,
    {
        let wanted = requests
            .iter()
            .enumerate()
            .map(|(initiator, addr)| {
                let addr = (*addr)?;
                let target = self.decode(initiator, addr);
                if target.is_none() {
                    trace!(initiator, addr, "request does not decode to a visible target");
                }
                target.filter(|_| initiator_open(initiator))
            })
            .collect::<Vec<_>>();

        (0..self.target_count())
            .filter(|t| target_open(*t))
            .filter_map(|target| {
                let contenders = &self.contenders[target];
                let requesting = contenders.iter().map(|i| wanted[*i] == Some(target)).collect::<Vec<_>>();
                let position = match &self.arbiters[target] {
                    Some(arbiter) => arbiter.grant(&requesting)?,
                    None => requesting.iter().position(|r| *r)?,
                };
                Some(SelectionEvent { initiator: contenders[position], target })
            })
            .collect()
    }

    /// Moves the request of an accepted selection to its target, translated to the target's offset.
    pub fn forward(&self, event: SelectionEvent, from: &mut VrChannel<Request>, to: &mut VrChannel<Request>) {
        let request = some_or!(from.accept(), panic!("accepted initiator {} has no request", event.initiator));
        let translated = Request { addr: self.ranges[event.target].offset(request.addr), ..request };
        assert!(to.push(translated).is_ok(), "accepted target {} is not ready", event.target);
    }

    /// Runs the address phase of a group over the request channels of its direction.
    ///
    /// Requests are admitted only while `order` has room for them; accepted requests are forwarded to their
    /// targets and recorded in `order`. Ports are indexed globally, events locally.
    pub(crate) fn accept(
        &mut self,
        layout: &GroupLayout,
        order: &mut OrderTracker,
        initiators: &mut [Port],
        targets: &mut [Port],
    ) -> Vec<SelectionEvent> {
        let direction = layout.direction();
        let (ini, tgt) = (layout.initiators(), layout.targets());

        let requests = ini.iter().map(|i| initiators[*i].request(direction).peek().map(|req| req.addr)).collect::<Vec<_>>();
        let selections = self.arbitrate(
            &requests,
            |i| order.initiator_has_room(i),
            |t| targets[tgt[t]].request(direction).can_push() && order.target_has_room(t),
        );

        for event in &selections {
            let (i, t) = (ini[event.initiator], tgt[event.target]);
            self.forward(*event, initiators[i].request_mut(direction), targets[t].request_mut(direction));
            order.record(*event);
        }
        self.commit(&selections);
        selections
    }

    /// Rotates the priority of every arbiter that granted a request.
    pub fn commit(&mut self, events: &[SelectionEvent]) {
        for event in events {
            let arbiter = some_or!(self.arbiters[event.target].as_mut(), continue);
            let position = self.contenders[event.target].iter().position(|i| *i == event.initiator);
            arbiter.ack(some_or!(position, continue));
        }
    }
}
