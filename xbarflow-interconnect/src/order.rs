//! Order queues.
//!
//! Data of a transaction must flow between the initiator and target its request was routed between, in
//! request order. Every accepted request is recorded twice: the initiator in the target's owner queue and the
//! target in the initiator's target queue. The data phase follows the queue heads and pops them on the last
//! beat.
//!
//! A queue exists only where there is a choice to remember: a target with a single potential initiator has
//! no owner queue, and an initiator with a single potential target has no target queue.

use arrayvec::ArrayVec;
use tracing::trace;
use xbarflow_std::Fifo;

use crate::addr_crossbar::SelectionEvent;
use crate::data_crossbar::Select;
use crate::layout::GroupLayout;

/// Maximum number of data lanes fed by one address channel.
pub const MAX_LANES: usize = 2;

/// Bounded queue of peer indices, one FIFO per data lane.
#[derive(Debug, Clone)]
pub struct OrderQueue {
    lanes: ArrayVec<Fifo<usize>, MAX_LANES>,
}

impl OrderQueue {
    fn new(lanes: usize, depth: usize) -> Self {
        assert!((1..=MAX_LANES).contains(&lanes), "{} lanes", lanes);
        Self { lanes: (0..lanes).map(|_| Fifo::new(depth)).collect() }
    }

    /// Returns `true` if every lane has room.
    pub fn has_room(&self) -> bool { self.lanes.iter().all(Fifo::can_enq) }

    /// Head of `lane`.
    pub fn head(&self, lane: usize) -> Option<usize> { self.lanes[lane].peek().copied() }

    /// Occupancy of `lane`.
    pub fn len(&self, lane: usize) -> usize { self.lanes[lane].len() }

    /// Returns `true` if every lane is empty.
    pub fn is_empty(&self) -> bool { self.lanes.iter().all(Fifo::is_empty) }

    fn push(&mut self, peer: usize) {
        for lane in &mut self.lanes {
            assert!(lane.enq(peer).is_ok(), "order queue overflow");
        }
    }

    fn pop(&mut self, lane: usize) -> Option<usize> { self.lanes[lane].deq() }

    fn select(&self, lane: usize) -> Select { self.head(lane).map_or(Select::Idle, Select::Peer) }
}

/// Order queues of one group.
#[derive(Debug, Clone)]
pub struct OrderTracker {
    /// Per target: initiators in acceptance order.
    target_owner: Vec<Option<OrderQueue>>,
    /// Per initiator: targets in acceptance order.
    initiator_target: Vec<Option<OrderQueue>>,
}

impl OrderTracker {
    /// Creates the queues of `layout` with `lanes` data lanes of depth `depth` each.
    pub fn new(layout: &GroupLayout, lanes: usize, depth: usize) -> Self {
        let target_owner = (0..layout.target_count())
            .map(|t| (layout.initiators_of(t).len() > 1).then(|| OrderQueue::new(lanes, depth)))
            .collect();
        let initiator_target = (0..layout.initiator_count())
            .map(|i| (layout.targets_of(i).len() > 1).then(|| OrderQueue::new(lanes, depth)))
            .collect();
        Self { target_owner, initiator_target }
    }

    /// Owner queue of `target`.
    pub fn target_owner(&self, target: usize) -> Option<&OrderQueue> { self.target_owner[target].as_ref() }

    /// Target queue of `initiator`.
    pub fn initiator_target(&self, initiator: usize) -> Option<&OrderQueue> {
        self.initiator_target[initiator].as_ref()
    }

    /// Returns `true` if `initiator` can have another transaction recorded.
    pub fn initiator_has_room(&self, initiator: usize) -> bool {
        self.initiator_target[initiator].as_ref().map_or(true, OrderQueue::has_room)
    }

    /// Returns `true` if `target` can have another transaction recorded.
    pub fn target_has_room(&self, target: usize) -> bool {
        self.target_owner[target].as_ref().map_or(true, OrderQueue::has_room)
    }

    /// Records an accepted request.
    pub fn record(&mut self, event: SelectionEvent) {
        if let Some(queue) = &mut self.target_owner[event.target] {
            queue.push(event.initiator);
        }
        if let Some(queue) = &mut self.initiator_target[event.initiator] {
            queue.push(event.target);
        }
    }

    /// Which initiator `target` currently serves on `lane`.
    pub fn owner_of(&self, lane: usize, target: usize) -> Select {
        self.target_owner[target].as_ref().map_or(Select::Wired, |q| q.select(lane))
    }

    /// Which target `initiator` currently talks to on `lane`.
    pub fn target_of(&self, lane: usize, initiator: usize) -> Select {
        self.initiator_target[initiator].as_ref().map_or(Select::Wired, |q| q.select(lane))
    }

    /// Retires the transaction between `initiator` and `target` on `lane`.
    pub fn complete(&mut self, lane: usize, initiator: usize, target: usize) {
        if let Some(queue) = &mut self.target_owner[target] {
            let popped = queue.pop(lane);
            debug_assert_eq!(popped, Some(initiator), "owner queue of target {} out of order", target);
            trace!(lane, target, initiator, "owner queue pop");
        }
        if let Some(queue) = &mut self.initiator_target[initiator] {
            let popped = queue.pop(lane);
            debug_assert_eq!(popped, Some(target), "target queue of initiator {} out of order", initiator);
            trace!(lane, initiator, target, "target queue pop");
        }
    }

    /// Number of transactions recorded on `lane` and not yet completed.
    ///
    /// Transactions between ports without queues are not counted.
    pub fn outstanding(&self, lane: usize) -> usize {
        let owners = self.target_owner.iter().flatten().map(|q| q.len(lane)).sum::<usize>();
        let targets = self.initiator_target.iter().flatten().map(|q| q.len(lane)).sum::<usize>();
        owners.max(targets)
    }

    /// Returns `true` if no queue holds an entry.
    pub fn is_empty(&self) -> bool {
        self.target_owner.iter().chain(&self.initiator_target).flatten().all(OrderQueue::is_empty)
    }
}
