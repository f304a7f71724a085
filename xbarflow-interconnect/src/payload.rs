//! Channel payloads.
//!
//! The fabric never inspects payloads beyond the request address and the last-beat marker of data beats.
//! Data words are carried in a `u64`; on a bus narrower than 64 bits only the low `data_width` bits and
//! `data_width / 8` strobes are meaningful, which the beat constructors below enforce.

use xbarflow::low_mask;

/// Data bits carried by a `data_width`-bit bus.
pub const fn data_mask(data_width: u32) -> u64 { low_mask(data_width) }

/// Strobes of a beat enabling every byte lane of a `data_width`-bit bus.
pub const fn full_strobe(data_width: u32) -> u8 { low_mask(data_width / 8) as u8 }

/// Burst-framed payload.
pub trait Framed {
    /// Returns `true` if this beat closes its transaction.
    fn is_last(&self) -> bool;
}

/// Transaction request on a read or write address channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    /// Transaction id, passed through untouched.
    pub id: u32,
    /// Byte address.
    pub addr: u64,
    /// Number of data beats minus one.
    pub len: u8,
    /// Byte enables of the final beat.
    pub last_mask: u8,
}

impl Request {
    /// Single-beat request.
    pub fn new(id: u32, addr: u64) -> Self { Self { id, addr, len: 0, last_mask: u8::MAX } }

    /// Request of `beats` data beats.
    ///
    /// # Panics
    ///
    /// Panics if `beats` is zero or exceeds 256.
    pub fn burst(id: u32, addr: u64, beats: usize) -> Self {
        assert!((1..=256).contains(&beats), "burst of {beats} beats");
        Self { id, addr, len: (beats - 1) as u8, last_mask: u8::MAX }
    }

    /// Number of data beats.
    pub fn beats(&self) -> usize { usize::from(self.len) + 1 }
}

/// Response status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// Success.
    #[default]
    Okay,
    /// The target reported an error.
    SlaveError,
}

/// Read data beat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadBeat {
    /// Transaction id.
    pub id: u32,
    /// Data word.
    pub data: u64,
    /// Status.
    pub resp: Response,
    /// Last beat of the burst.
    pub last: bool,
}

impl ReadBeat {
    /// Successful beat of a `data_width`-bit bus; `data` is truncated to the bus.
    pub fn new(id: u32, data: u64, data_width: u32, last: bool) -> Self {
        Self { id, data: data & data_mask(data_width), resp: Response::Okay, last }
    }
}

impl Framed for ReadBeat {
    fn is_last(&self) -> bool { self.last }
}

/// Write data beat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteBeat {
    /// Data word.
    pub data: u64,
    /// Byte strobes.
    pub strb: u8,
    /// Last beat of the burst.
    pub last: bool,
}

impl WriteBeat {
    /// Beat of a `data_width`-bit bus writing every byte lane; `data` is truncated to the bus.
    pub fn full(data: u64, data_width: u32, last: bool) -> Self {
        Self { data: data & data_mask(data_width), strb: full_strobe(data_width), last }
    }
}

impl Framed for WriteBeat {
    fn is_last(&self) -> bool { self.last }
}

/// Write acknowledge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteAck {
    /// Transaction id.
    pub id: u32,
    /// Status.
    pub resp: Response,
}

impl Framed for WriteAck {
    fn is_last(&self) -> bool { true }
}
