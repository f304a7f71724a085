//! Write fabric of one group.

use tracing::trace;

use crate::addr_crossbar::AddrCrossbar;
use crate::data_crossbar::DataCrossbar;
use crate::layout::GroupLayout;
use crate::order::OrderTracker;
use crate::visibility::Direction;
use crate::{Port, WriteAck, WriteBeat};

/// Lane of the write data.
const W: usize = 0;
/// Lane of the write acknowledges.
const B: usize = 1;

/// Write requests routed to targets; write data follows its request, acknowledges return in request order.
#[derive(Debug, Clone)]
pub struct WriteMatrix {
    group: usize,
    layout: GroupLayout,
    addr: AddrCrossbar,
    order: OrderTracker,
    /// Initiators to targets.
    data: DataCrossbar<WriteBeat>,
    /// Targets to initiators.
    ack: DataCrossbar<WriteAck>,
}

impl WriteMatrix {
    /// Creates the fabric of write group `group`.
    pub fn new(group: usize, layout: GroupLayout, addr_width: u32, max_overlap: usize) -> Self {
        debug_assert_eq!(layout.direction(), Direction::Write);
        let addr = AddrCrossbar::new(&layout, addr_width);
        let order = OrderTracker::new(&layout, 2, max_overlap);
        let data = DataCrossbar::new((0..layout.target_count()).map(|t| layout.initiators_of(t).clone()).collect());
        let ack = DataCrossbar::new((0..layout.initiator_count()).map(|i| layout.targets_of(i).clone()).collect());
        Self { group, layout, addr, order, data, ack }
    }

    /// Port layout.
    pub fn layout(&self) -> &GroupLayout { &self.layout }

    /// Address-phase switch.
    pub fn router(&self) -> &AddrCrossbar { &self.addr }

    /// Order queues.
    pub fn order(&self) -> &OrderTracker { &self.order }

    /// Number of write transactions not yet acknowledged.
    pub fn outstanding(&self) -> usize { self.order.outstanding(B) }

    /// Advances one cycle.
    pub fn step(&mut self, initiators: &mut [Port], targets: &mut [Port]) {
        let ini = self.layout.initiators();
        let tgt = self.layout.targets();

        let data = {
            let offers = ini.iter().map(|i| initiators[*i].w.peek()).collect::<Vec<_>>();
            let ready = tgt.iter().map(|t| targets[*t].w.can_push()).collect::<Vec<_>>();
            self.data.route(&offers, &ready, |i| self.order.target_of(W, i), |t| self.order.owner_of(W, t))
        };
        let acks = {
            let offers = tgt.iter().map(|t| targets[*t].b.peek()).collect::<Vec<_>>();
            let ready = ini.iter().map(|i| initiators[*i].b.can_push()).collect::<Vec<_>>();
            self.ack.route(&offers, &ready, |t| self.order.owner_of(B, t), |i| self.order.target_of(B, i))
        };

        for event in self.addr.accept(&self.layout, &mut self.order, initiators, targets) {
            trace!(group = self.group, initiator = ini[event.initiator], target = tgt[event.target], "write request accepted");
        }

        for transfer in &data {
            let (i, t) = (ini[transfer.din], tgt[transfer.dout]);
            self.data.forward(*transfer, &mut initiators[i].w, &mut targets[t].w);
            trace!(group = self.group, initiator = i, target = t, last = transfer.last, "write beat");
            if transfer.last {
                self.order.complete(W, transfer.din, transfer.dout);
            }
        }
        self.data.commit(&data);

        for transfer in &acks {
            let (t, i) = (tgt[transfer.din], ini[transfer.dout]);
            self.ack.forward(*transfer, &mut targets[t].b, &mut initiators[i].b);
            trace!(group = self.group, initiator = i, target = t, "write acknowledge");
            self.order.complete(B, transfer.dout, transfer.din);
        }
        self.ack.commit(&acks);
    }
}
