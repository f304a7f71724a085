//! Traffic demo.
//!
//! Every initiator issues single-beat reads and writes round-robin over the targets it can see. Targets answer
//! in the cycle after a request arrives.

use std::collections::VecDeque;

use anyhow::{anyhow, ensure, Result};
use itertools::izip;
use tracing::info;
use xbarflow::{some_or, Clock, Module};
use xbarflow_interconnect::{Direction, Interconnect, Port, ReadBeat, Request, WriteAck, WriteBeat};

/// Outcome of a demo run.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Summary {
    pub(crate) cycles: u64,
    pub(crate) reads: usize,
    pub(crate) writes: usize,
}

/// Memory-less target answering in request order.
#[derive(Debug, Default, Clone)]
struct Responder {
    data_width: u32,
    r: VecDeque<ReadBeat>,
    b: VecDeque<WriteAck>,
    aws: VecDeque<Request>,
    bursts: usize,
}

impl Responder {
    fn collect(&mut self, port: &mut Port) {
        if let Some(request) = port.ar.take() {
            self.r.push_back(ReadBeat::new(request.id, request.addr, self.data_width, true));
        }
        if let Some(request) = port.aw.take() {
            self.aws.push_back(request);
        }
        if port.w.take().map_or(false, |beat| beat.last) {
            self.bursts += 1;
        }
        while self.bursts > 0 {
            let request = some_or!(self.aws.pop_front(), break);
            self.bursts -= 1;
            self.b.push_back(WriteAck { id: request.id, ..WriteAck::default() });
        }
    }
}

/// `count` requests of initiator `index` in `direction`, round-robin over the targets it can see.
fn traffic(xbar: &Interconnect, index: usize, direction: Direction, count: usize) -> VecDeque<Request> {
    let map = xbar.address_map();
    let bases = map.initiators()[index]
        .iter()
        .filter(|(_, mode)| mode.allows(direction))
        .map(|(target, _)| map.targets()[*target].base)
        .collect::<Vec<_>>();
    if bases.is_empty() {
        return VecDeque::new();
    }
    (0..count).map(|n| Request::new(n as u32, bases[n % bases.len()] + 8 * n as u64)).collect()
}

pub(crate) fn run(mut xbar: Interconnect, per_initiator: usize, budget: u64) -> Result<Summary> {
    let mut ports = xbar.ports();
    let mut clock = Clock::new();

    let mut reads = (0..ports.initiators.len()).map(|i| traffic(&xbar, i, Direction::Read, per_initiator)).collect::<Vec<_>>();
    let mut writes =
        (0..ports.initiators.len()).map(|i| traffic(&xbar, i, Direction::Write, per_initiator)).collect::<Vec<_>>();
    let expected = reads.iter().chain(&writes).map(VecDeque::len).sum::<usize>();

    let data_width = xbar.data_width();
    let mut responders = vec![Responder { data_width, ..Responder::default() }; ports.targets.len()];
    let mut summary = Summary::default();

    while summary.reads + summary.writes < expected {
        ensure!(clock.cycle() < budget, "{}: traffic did not drain in {} cycles", xbar.get_module_name(), budget);

        for (port, reads, writes) in izip!(&mut ports.initiators, &mut reads, &mut writes) {
            if !port.ar.is_valid() {
                if let Some(request) = reads.pop_front() {
                    port.ar.offer(request).map_err(|_| anyhow!("read channel refused an offer"))?;
                }
            }
            if !port.aw.is_valid() && !port.w.is_valid() {
                if let Some(request) = writes.pop_front() {
                    port.aw.offer(request).map_err(|_| anyhow!("write channel refused an offer"))?;
                    let beat = WriteBeat::full(request.addr, data_width, true);
                    port.w.offer(beat).map_err(|_| anyhow!("write data channel refused an offer"))?;
                }
            }
            port.r.set_ready(true);
            port.b.set_ready(true);
        }
        for (port, responder) in ports.targets.iter_mut().zip(&mut responders) {
            port.ar.set_ready(true);
            port.aw.set_ready(true);
            port.w.set_ready(true);
            if !port.r.is_valid() {
                if let Some(beat) = responder.r.pop_front() {
                    port.r.offer(beat).map_err(|_| anyhow!("read data channel refused an offer"))?;
                }
            }
            if !port.b.is_valid() {
                if let Some(ack) = responder.b.pop_front() {
                    port.b.offer(ack).map_err(|_| anyhow!("acknowledge channel refused an offer"))?;
                }
            }
        }

        clock.tick(&mut xbar, &mut ports);

        for port in &mut ports.initiators {
            summary.reads += usize::from(port.r.take().is_some());
            summary.writes += usize::from(port.b.take().is_some());
        }
        for (port, responder) in ports.targets.iter_mut().zip(&mut responders) {
            responder.collect(port);
        }
    }

    summary.cycles = clock.cycle();
    info!(cycles = summary.cycles, reads = summary.reads, writes = summary.writes, "traffic drained");
    Ok(summary)
}
