//! Configuration errors.

use thiserror::Error;

/// Error raised while elaborating an interconnect.
///
/// All of them are fatal: the topology is fixed for the lifetime of the fabric.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("target {target}: size {size:#x} is not a power of two")]
    NonPowerOfTwoSize { target: usize, size: u64 },

    #[error("target {target}: base {base:#x} is not aligned to its size {size:#x}")]
    Misaligned { target: usize, base: u64, size: u64 },

    #[error("targets {first} and {second} overlap")]
    Overlap { first: usize, second: usize },

    #[error("initiator {initiator} references target {target}, but there are only {target_count} targets")]
    InvalidVisibility { initiator: usize, target: usize, target_count: usize },

    #[error("maximum transaction overlap must be nonzero")]
    ZeroOverlap,

    #[error("data width {width} is not one of 8, 16, 32 or 64")]
    InvalidDataWidth { width: u32 },

    #[error("address width {configured} is narrower than the {required} bits the address map needs")]
    AddressWidth { required: u32, configured: u32 },
}
