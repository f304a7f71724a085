//! Testbench: initiator agents issuing traffic and target agents answering it.
//!
//! Read data encodes the serving target and the address of the beat, write data encodes the request id, so
//! agents can check on the fly that every beat reached the right place in the right order.

#![allow(dead_code)]

use std::collections::VecDeque;

use xbarflow::Clock;
use xbarflow_interconnect::{
    data_mask, full_strobe, Direction, Interconnect, InterconnectConfig, InterconnectPorts, Port, PortCaps, ReadBeat,
    Request, WriteAck, WriteBeat,
};

/// Cyclic handshake pattern. Empty means always asserted.
#[derive(Debug, Default, Clone)]
pub struct Pattern(pub Vec<bool>);

impl Pattern {
    pub fn always() -> Self { Self(Vec::new()) }

    pub fn never() -> Self { Self(vec![false]) }

    pub fn at(&self, cycle: u64) -> bool {
        if self.0.is_empty() {
            true
        } else {
            self.0[(cycle % self.0.len() as u64) as usize]
        }
    }
}

/// Read data word produced by `target` for the beat at `addr`.
pub fn read_data(target: usize, addr: u64) -> u64 { (target as u64) << 40 | addr }

/// Write data word of beat `beat` of request `id`.
pub fn write_data(id: u32, beat: usize) -> u64 { u64::from(id) << 16 | beat as u64 }

/// Request id of the `seq`-th request of `initiator`.
pub fn request_id(initiator: usize, seq: usize) -> u32 { (initiator << 16 | seq) as u32 }

/// Initiator owning request `id`.
pub fn initiator_of(id: u32) -> usize { (id >> 16) as usize }

#[derive(Debug, Clone)]
struct PendingRead {
    request: Request,
    target: usize,
    offset: u64,
    beat: usize,
}

#[derive(Debug, Default)]
pub struct InitiatorAgent {
    pub index: usize,
    pub data_width: u32,
    pub caps: PortCaps,
    pub issue: Pattern,
    pub r_ready: Pattern,
    pub b_ready: Pattern,
    pub w_valid: Pattern,
    reads: VecDeque<PendingRead>,
    writes: VecDeque<Request>,
    w_beats: VecDeque<WriteBeat>,
    read_inflight: VecDeque<PendingRead>,
    write_inflight: VecDeque<u32>,
    read_seq: usize,
    write_seq: usize,
    /// Ids of completed reads, in completion order.
    pub reads_done: Vec<u32>,
    /// Ids of acknowledged writes, in completion order.
    pub writes_done: Vec<u32>,
    /// Ids of reads and writes in the order the fabric accepted them.
    pub reads_accepted: Vec<u32>,
    pub writes_accepted: Vec<u32>,
}

impl InitiatorAgent {
    pub fn new(index: usize, data_width: u32, caps: PortCaps) -> Self {
        Self { index, data_width, caps, ..Self::default() }
    }

    /// Queues a read expected to be served by `target` at `offset`.
    pub fn read(&mut self, addr: u64, beats: usize, target: usize, offset: u64) -> u32 {
        let id = request_id(self.index, self.read_seq);
        self.read_seq += 1;
        self.reads.push_back(PendingRead { request: Request::burst(id, addr, beats), target, offset, beat: 0 });
        id
    }

    /// Queues a write.
    pub fn write(&mut self, addr: u64, beats: usize) -> u32 {
        let id = request_id(self.index, self.write_seq);
        self.write_seq += 1;
        self.writes.push_back(Request::burst(id, addr, beats));
        for beat in 0..beats {
            self.w_beats.push_back(WriteBeat::full(write_data(id, beat), self.data_width, beat + 1 == beats));
        }
        id
    }

    /// Reads not yet accepted by the fabric.
    pub fn pending_reads(&self) -> usize { self.reads.len() }

    /// Writes not yet accepted by the fabric.
    pub fn pending_writes(&self) -> usize { self.writes.len() }

    pub fn is_done(&self) -> bool {
        self.reads.is_empty()
            && self.writes.is_empty()
            && self.w_beats.is_empty()
            && self.read_inflight.is_empty()
            && self.write_inflight.is_empty()
    }

    fn drive(&mut self, port: &mut Port, cycle: u64) {
        for direction in [Direction::Read, Direction::Write] {
            let front = match direction {
                Direction::Read => self.reads.front().map(|read| read.request),
                Direction::Write => self.writes.front().copied(),
            };
            let channel = port.request_mut(direction);
            if let Some(request) = front.filter(|_| !channel.is_valid() && self.issue.at(cycle)) {
                assert!(self.caps.has(direction), "initiator {}: {} request on a tied-off port", self.index, direction);
                channel.offer(request).unwrap();
            }
        }
        if !port.w.is_valid() && self.w_valid.at(cycle) {
            if let Some(beat) = self.w_beats.pop_front() {
                port.w.offer(beat).unwrap();
            }
        }
        port.r.set_ready(self.r_ready.at(cycle));
        port.b.set_ready(self.b_ready.at(cycle));
    }

    fn collect(&mut self, port: &mut Port) {
        if let Some(beat) = port.r.take() {
            self.receive_read(beat);
        }
        if let Some(ack) = port.b.take() {
            self.receive_ack(ack);
        }
    }

    fn receive_read(&mut self, beat: ReadBeat) {
        let read = self.read_inflight.front_mut().expect("read data without a request");
        assert_eq!(beat.id, read.request.id, "initiator {}: read data out of order", self.index);
        let expected = read_data(read.target, read.offset + read.beat as u64) & data_mask(self.data_width);
        assert_eq!(beat.data, expected, "initiator {}", self.index);
        read.beat += 1;
        assert_eq!(beat.last, read.beat == read.request.beats(), "initiator {}: burst framing", self.index);
        if beat.last {
            self.reads_done.push(beat.id);
            let _ = self.read_inflight.pop_front();
        }
    }

    fn receive_ack(&mut self, ack: WriteAck) {
        let id = self.write_inflight.pop_front().expect("write acknowledge without a request");
        assert_eq!(ack.id, id, "initiator {}: write acknowledge out of order", self.index);
        self.writes_done.push(id);
    }
}

#[derive(Debug, Default)]
pub struct TargetAgent {
    pub index: usize,
    pub data_width: u32,
    pub latency: u64,
    pub ar_ready: Pattern,
    pub aw_ready: Pattern,
    pub w_ready: Pattern,
    r_beats: VecDeque<(u64, ReadBeat)>,
    acks: VecDeque<(u64, WriteAck)>,
    aws: VecDeque<Request>,
    w_bursts: VecDeque<Vec<WriteBeat>>,
    w_current: Vec<WriteBeat>,
    /// Read requests in arrival order, with the arrival cycle.
    pub reads: Vec<(u64, Request)>,
    /// Write requests in arrival order, with the arrival cycle.
    pub writes: Vec<(u64, Request)>,
}

impl TargetAgent {
    pub fn new(index: usize, data_width: u32) -> Self { Self { index, data_width, latency: 1, ..Self::default() } }

    pub fn is_done(&self) -> bool {
        self.r_beats.is_empty()
            && self.acks.is_empty()
            && self.aws.is_empty()
            && self.w_bursts.is_empty()
            && self.w_current.is_empty()
    }

    fn drive(&mut self, port: &mut Port, cycle: u64) {
        port.ar.set_ready(self.ar_ready.at(cycle));
        port.aw.set_ready(self.aw_ready.at(cycle));
        port.w.set_ready(self.w_ready.at(cycle));
        if !port.r.is_valid() && self.r_beats.front().map_or(false, |(at, _)| *at <= cycle) {
            let (_, beat) = self.r_beats.pop_front().unwrap();
            port.r.offer(beat).unwrap();
        }
        if !port.b.is_valid() && self.acks.front().map_or(false, |(at, _)| *at <= cycle) {
            let (_, ack) = self.acks.pop_front().unwrap();
            port.b.offer(ack).unwrap();
        }
    }

    fn collect(&mut self, port: &mut Port, cycle: u64) {
        if let Some(request) = port.ar.take() {
            for beat in 0..request.beats() {
                let data = read_data(self.index, request.addr + beat as u64);
                let beat = ReadBeat::new(request.id, data, self.data_width, beat + 1 == request.beats());
                self.r_beats.push_back((cycle + self.latency, beat));
            }
            self.reads.push((cycle, request));
        }
        if let Some(request) = port.aw.take() {
            self.aws.push_back(request);
            self.writes.push((cycle, request));
        }
        if let Some(beat) = port.w.take() {
            self.w_current.push(beat);
            if beat.last {
                self.w_bursts.push_back(std::mem::take(&mut self.w_current));
            }
        }
        while !self.aws.is_empty() && !self.w_bursts.is_empty() {
            let request = self.aws.pop_front().unwrap();
            let burst = self.w_bursts.pop_front().unwrap();
            assert_eq!(burst.len(), request.beats(), "target {}: write burst length", self.index);
            for (beat, word) in burst.iter().enumerate() {
                let expected = write_data(request.id, beat) & data_mask(self.data_width);
                assert_eq!(word.data, expected, "target {}: write data misrouted", self.index);
                assert_eq!(word.strb, full_strobe(self.data_width), "target {}: write strobes", self.index);
            }
            self.acks.push_back((cycle + self.latency, WriteAck { id: request.id, ..WriteAck::default() }));
        }
    }
}

/// Interconnect with one agent per port.
#[derive(Debug)]
pub struct Bench {
    pub xbar: Interconnect,
    pub ports: InterconnectPorts,
    pub clock: Clock,
    pub initiators: Vec<InitiatorAgent>,
    pub targets: Vec<TargetAgent>,
}

impl Bench {
    pub fn new(config: InterconnectConfig) -> Self {
        let xbar = Interconnect::new(config).unwrap();
        let ports = xbar.ports();
        let width = xbar.data_width();
        let initiators =
            (0..ports.initiators.len()).map(|i| InitiatorAgent::new(i, width, xbar.initiator_caps(i))).collect();
        let targets = (0..ports.targets.len()).map(|t| TargetAgent::new(t, width)).collect();
        Self { xbar, ports, clock: Clock::new(), initiators, targets }
    }

    /// Queues a read of `beats` beats at `addr` from `initiator`.
    pub fn read(&mut self, initiator: usize, addr: u64, beats: usize) -> u32 {
        let target = self.xbar.address_map().decode(addr).expect("read outside the address map");
        let offset = self.xbar.address_map().targets()[target].offset(addr);
        self.initiators[initiator].read(addr, beats, target, offset)
    }

    /// Queues a write of `beats` beats at `addr` from `initiator`.
    pub fn write(&mut self, initiator: usize, addr: u64, beats: usize) -> u32 { self.initiators[initiator].write(addr, beats) }

    pub fn step(&mut self) {
        let cycle = self.clock.cycle();
        for (agent, port) in self.initiators.iter_mut().zip(&mut self.ports.initiators) {
            agent.drive(port, cycle);
        }
        for (agent, port) in self.targets.iter_mut().zip(&mut self.ports.targets) {
            agent.drive(port, cycle);
        }

        let ar_offered = self.ports.initiators.iter().map(|p| p.request(Direction::Read).peek().copied()).collect::<Vec<_>>();
        let aw_offered = self.ports.initiators.iter().map(|p| p.request(Direction::Write).peek().copied()).collect::<Vec<_>>();

        self.clock.tick(&mut self.xbar, &mut self.ports);

        for (((agent, port), ar), aw) in
            self.initiators.iter_mut().zip(&mut self.ports.initiators).zip(ar_offered).zip(aw_offered)
        {
            if ar.is_some() && !port.ar.is_valid() {
                let read = agent.reads.pop_front().unwrap();
                agent.reads_accepted.push(read.request.id);
                agent.read_inflight.push_back(read);
            }
            if aw.is_some() && !port.aw.is_valid() {
                let write = agent.writes.pop_front().unwrap();
                agent.writes_accepted.push(write.id);
                agent.write_inflight.push_back(write.id);
            }
            agent.collect(port);
        }
        for (agent, port) in self.targets.iter_mut().zip(&mut self.ports.targets) {
            agent.collect(port, cycle);
        }
    }

    pub fn is_done(&self) -> bool {
        self.initiators.iter().all(InitiatorAgent::is_done) && self.targets.iter().all(TargetAgent::is_done)
    }

    /// Steps until every agent is done. Panics after `budget` cycles.
    pub fn run(&mut self, budget: u64) -> u64 {
        let start = self.clock.cycle();
        while !self.is_done() {
            assert!(self.clock.cycle() - start < budget, "traffic did not drain within {} cycles", budget);
            self.step();
        }
        assert!(self.ports.is_idle());
        assert_eq!(self.xbar.outstanding(), 0);
        self.clock.cycle() - start
    }
}
