//! Data-phase switch.
//!
//! Moves burst beats from inputs ("din") to outputs ("dout") over a static connection relation. Which input
//! an output serves, and which output an input feeds, is dictated by the order queues: a beat moves from din
//! `i` to dout `j` iff they are connected, din `i` offers, dout `j` is ready, and every queue guarding either
//! side selects the other side. A queue entry is retired by the last beat of its burst.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use tracing::trace;
use xbarflow::{some_or, VrChannel};

use crate::Framed;

/// What the order queue guarding a port selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Select {
    /// No queue: the port is wired to its only peer.
    Wired,
    /// The queue is empty; nothing may pass.
    Idle,
    /// The queue head.
    Peer(usize),
}

impl Select {
    /// Returns `true` if a beat from or to `peer` may pass.
    pub fn admits(self, peer: usize) -> bool {
        match self {
            Self::Wired => true,
            Self::Idle => false,
            Self::Peer(head) => head == peer,
        }
    }
}

/// Burst state of an output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Between bursts.
    #[default]
    Idle,
    /// Inside a burst from `peer`.
    Selected {
        /// Input feeding the burst.
        peer: usize,
    },
}

/// Beat moved from `din` to `dout` in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Input.
    pub din: usize,
    /// Output.
    pub dout: usize,
    /// Last beat of the burst.
    pub last: bool,
}

/// Data-phase N:M switch carrying beats of type `V`.
#[derive(Debug, Clone)]
pub struct DataCrossbar<V> {
    /// Connected inputs of each output.
    sources: Vec<BTreeSet<usize>>,
    slots: Vec<SlotState>,
    _marker: PhantomData<V>,
}

impl<V: Framed> DataCrossbar<V> {
    /// Creates a switch whose output `j` is connected to the inputs in `sources[j]`.
    pub fn new(sources: Vec<BTreeSet<usize>>) -> Self {
        let slots = vec![SlotState::Idle; sources.len()];
        Self { sources, slots, _marker: PhantomData }
    }

    /// Number of outputs.
    pub fn output_count(&self) -> usize { self.sources.len() }

    /// Burst state of `dout`.
    pub fn slot(&self, dout: usize) -> SlotState { self.slots[dout] }

    /// Decides which beats move this cycle.
    ///
    /// `offers[i]` is the beat offered by din `i`, `ready[j]` whether dout `j` can take one. `din_select(i)` is
    /// the queue guarding din `i` (its head names a dout), `dout_select(j)` the one guarding dout `j` (its head
    /// names a din).
    pub fn route<I, O>(&self, offers: &[Option<&V>], ready: &[bool], din_select: I, dout_select: O) -> Vec<Transfer>
    where
        I: Fn(usize) -> Select,
        O: Fn(usize) -> Select,
    {
        let transfers = (0..self.output_count())
            .filter(|dout| ready[*dout])
            .filter_map(|dout| {
                let select = dout_select(dout);
                let din = self.sources[dout].iter().copied().find(|din| {
                    offers[*din].is_some() && select.admits(*din) && din_select(*din).admits(dout)
                })?;
                let last = offers[din].map_or(false, |beat| beat.is_last());
                Some(Transfer { din, dout, last })
            })
            .collect::<Vec<_>>();

        debug_assert!(
            transfers.iter().map(|t| t.din).collect::<BTreeSet<_>>().len() == transfers.len(),
            "an input feeds two outputs"
        );
        transfers
    }

    /// Moves the beat of `transfer`.
    pub fn forward(&self, transfer: Transfer, from: &mut VrChannel<V>, to: &mut VrChannel<V>) {
        let beat = some_or!(from.accept(), panic!("routed input {} has no beat", transfer.din));
        if to.push(beat).is_err() {
            panic!("routed output {} is not ready", transfer.dout);
        }
    }

    /// Updates burst states after `transfers` moved.
    pub fn commit(&mut self, transfers: &[Transfer]) {
        for transfer in transfers {
            let slot = &mut self.slots[transfer.dout];
            if let SlotState::Selected { peer } = *slot {
                debug_assert_eq!(peer, transfer.din, "burst on output {} switched input", transfer.dout);
            }
            *slot = if transfer.last {
                trace!(din = transfer.din, dout = transfer.dout, "burst end");
                SlotState::Idle
            } else {
                SlotState::Selected { peer: transfer.din }
            };
        }
    }
}
