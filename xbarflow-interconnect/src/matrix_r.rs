//! Read fabric of one group.

use tracing::trace;

use crate::addr_crossbar::AddrCrossbar;
use crate::data_crossbar::DataCrossbar;
use crate::layout::GroupLayout;
use crate::order::OrderTracker;
use crate::visibility::Direction;
use crate::{Port, ReadBeat};

/// Lane of the read data.
const R: usize = 0;

/// Read requests routed to targets, read data routed back in request order.
#[derive(Debug, Clone)]
pub struct ReadMatrix {
    group: usize,
    layout: GroupLayout,
    addr: AddrCrossbar,
    order: OrderTracker,
    /// Targets to initiators.
    data: DataCrossbar<ReadBeat>,
}

impl ReadMatrix {
    /// Creates the fabric of read group `group`.
    pub fn new(group: usize, layout: GroupLayout, addr_width: u32, max_overlap: usize) -> Self {
        debug_assert_eq!(layout.direction(), Direction::Read);
        let addr = AddrCrossbar::new(&layout, addr_width);
        let order = OrderTracker::new(&layout, 1, max_overlap);
        let data = DataCrossbar::new((0..layout.initiator_count()).map(|i| layout.targets_of(i).clone()).collect());
        Self { group, layout, addr, order, data }
    }

    /// Port layout.
    pub fn layout(&self) -> &GroupLayout { &self.layout }

    /// Address-phase switch.
    pub fn router(&self) -> &AddrCrossbar { &self.addr }

    /// Order queues.
    pub fn order(&self) -> &OrderTracker { &self.order }

    /// Number of read transactions whose data has not completed.
    pub fn outstanding(&self) -> usize { self.order.outstanding(R) }

    /// Advances one cycle.
    pub fn step(&mut self, initiators: &mut [Port], targets: &mut [Port]) {
        let ini = self.layout.initiators();
        let tgt = self.layout.targets();

        let transfers = {
            let offers = tgt.iter().map(|t| targets[*t].r.peek()).collect::<Vec<_>>();
            let ready = ini.iter().map(|i| initiators[*i].r.can_push()).collect::<Vec<_>>();
            self.data.route(&offers, &ready, |t| self.order.owner_of(R, t), |i| self.order.target_of(R, i))
        };

        for event in self.addr.accept(&self.layout, &mut self.order, initiators, targets) {
            trace!(group = self.group, initiator = ini[event.initiator], target = tgt[event.target], "read request accepted");
        }

        for transfer in &transfers {
            let (t, i) = (tgt[transfer.din], ini[transfer.dout]);
            self.data.forward(*transfer, &mut targets[t].r, &mut initiators[i].r);
            trace!(group = self.group, initiator = i, target = t, last = transfer.last, "read beat");
            if transfer.last {
                self.order.complete(R, transfer.dout, transfer.din);
            }
        }
        self.data.commit(&transfers);
    }
}
