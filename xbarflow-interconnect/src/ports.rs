//! External ports.

use xbarflow::VrChannel;

use crate::visibility::Direction;
use crate::{ReadBeat, Request, WriteAck, WriteBeat};

/// Channels of one bus port.
///
/// On an initiator port the fabric consumes `ar`, `aw` and `w` and produces `r` and `b`; on a target port it is
/// the other way around.
#[derive(Debug, Clone, Default)]
pub struct Port {
    /// Read requests.
    pub ar: VrChannel<Request>,
    /// Read data.
    pub r: VrChannel<ReadBeat>,
    /// Write requests.
    pub aw: VrChannel<Request>,
    /// Write data.
    pub w: VrChannel<WriteBeat>,
    /// Write acknowledges.
    pub b: VrChannel<WriteAck>,
}

impl Port {
    /// Port whose channels of a missing direction are tied off.
    pub fn new(caps: PortCaps) -> Self {
        let mut port = Self::default();
        if !caps.has(Direction::Read) {
            port.ar = VrChannel::tied_off();
            port.r = VrChannel::tied_off();
        }
        if !caps.has(Direction::Write) {
            port.aw = VrChannel::tied_off();
            port.w = VrChannel::tied_off();
            port.b = VrChannel::tied_off();
        }
        port
    }

    /// Request channel of `direction`.
    pub fn request(&self, direction: Direction) -> &VrChannel<Request> {
        match direction {
            Direction::Read => &self.ar,
            Direction::Write => &self.aw,
        }
    }

    /// Mutable request channel of `direction`.
    pub fn request_mut(&mut self, direction: Direction) -> &mut VrChannel<Request> {
        match direction {
            Direction::Read => &mut self.ar,
            Direction::Write => &mut self.aw,
        }
    }

    /// Returns `true` if no channel holds a payload.
    pub fn is_idle(&self) -> bool {
        self.ar.is_idle() && self.r.is_idle() && self.aw.is_idle() && self.w.is_idle() && self.b.is_idle()
    }
}

/// Directions a port takes part in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortCaps {
    /// Member of a read group.
    pub read: bool,
    /// Member of a write group.
    pub write: bool,
}

impl PortCaps {
    /// Returns `true` if the port takes part in `direction`.
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Read => self.read,
            Direction::Write => self.write,
        }
    }
}

/// Every external port of an interconnect, by global port number.
#[derive(Debug, Clone, Default)]
pub struct InterconnectPorts {
    /// Initiator ports.
    pub initiators: Vec<Port>,
    /// Target ports.
    pub targets: Vec<Port>,
}

impl InterconnectPorts {
    /// Returns `true` if no channel holds a payload.
    pub fn is_idle(&self) -> bool { self.initiators.iter().chain(&self.targets).all(Port::is_idle) }
}
