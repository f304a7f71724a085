//! Address map.
//!
//! Targets are configured with a power-of-two size and either a fixed base or [`BaseAddress::Auto`].
//! Normalization resolves automatic bases, checks alignment and rejects overlapping ranges. Targets keep
//! their configuration index throughout; [`AddressMap::sorted`] gives the ranges in address order.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xbarflow::{align_up, clog2, flog2, is_pow2};

use crate::visibility::{normalize_initiators, Links, Visibility};
use crate::{AccessMode, ConfigError};

/// Configured base address of a target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum BaseAddress {
    /// Placed right after the previous target, aligned up to the target's size.
    #[default]
    Auto,
    /// Fixed base address.
    Fixed(u64),
}

impl From<Option<u64>> for BaseAddress {
    fn from(base: Option<u64>) -> Self { base.map_or(Self::Auto, Self::Fixed) }
}

impl From<BaseAddress> for Option<u64> {
    fn from(base: BaseAddress) -> Self {
        match base {
            BaseAddress::Auto => None,
            BaseAddress::Fixed(base) => Some(base),
        }
    }
}

/// Target as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Base address. Omitted means [`BaseAddress::Auto`].
    #[serde(default)]
    pub base: BaseAddress,
    /// Size in bytes, a power of two.
    pub size: u64,
}

impl TargetSpec {
    /// Target at a fixed base.
    pub fn fixed(base: u64, size: u64) -> Self { Self { base: BaseAddress::Fixed(base), size } }

    /// Target placed automatically.
    pub fn auto(size: u64) -> Self { Self { base: BaseAddress::Auto, size } }
}

/// Normalized address range of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetRange {
    /// Base address, aligned to `size`.
    pub base: u64,
    /// Size in bytes, a power of two.
    pub size: u64,
}

impl TargetRange {
    /// Bits of the address that select a target.
    pub fn mask(&self) -> u64 { !(self.size - 1) }

    /// Value of the selecting bits for addresses inside the range.
    pub fn prefix(&self) -> u64 { self.base & self.mask() }

    /// Returns `true` if `addr` falls inside the range.
    pub fn matches(&self, addr: u64) -> bool { addr & self.mask() == self.prefix() }

    /// Offset of `addr` inside the range.
    pub fn offset(&self, addr: u64) -> u64 { addr & (self.size - 1) }

    /// Number of address bits inside the range.
    pub fn offset_bits(&self) -> u32 { flog2(self.size) }

    /// Highest address of the range.
    pub fn last(&self) -> u64 { self.base + (self.size - 1) }

    /// One past the highest address of the range.
    pub fn end(&self) -> u128 { u128::from(self.base) + u128::from(self.size) }
}

/// Resolves automatic bases and validates targets.
///
/// An automatic target is placed at the end of the previous target in configuration order, rounded up to its
/// own size. The first automatic target starts from zero.
pub fn normalize_targets(specs: &[TargetSpec]) -> Result<Vec<TargetRange>, ConfigError> {
    let mut ranges = Vec::<TargetRange>::with_capacity(specs.len());

    for (target, spec) in specs.iter().enumerate() {
        let size = spec.size;
        if !is_pow2(size) {
            return Err(ConfigError::NonPowerOfTwoSize { target, size });
        }

        let base = match spec.base {
            BaseAddress::Fixed(base) => base,
            BaseAddress::Auto => {
                let cursor = ranges.last().map_or(Some(0), |prev| prev.base.checked_add(prev.size));
                let aligned = cursor.filter(|cursor| cursor.checked_add(size - 1).is_some()).map(|cursor| align_up(cursor, size));
                match aligned {
                    Some(base) => base,
                    None => return Err(ConfigError::Overlap { first: target - 1, second: target }),
                }
            }
        };
        if base & (size - 1) != 0 {
            return Err(ConfigError::Misaligned { target, base, size });
        }
        ranges.push(TargetRange { base, size });
    }

    let overlap = ranges
        .iter()
        .enumerate()
        .sorted_by_key(|(_, range)| range.base)
        .tuple_windows()
        .find(|((_, lo), (_, hi))| lo.last() >= hi.base);
    if let Some(((first, _), (second, _))) = overlap {
        return Err(ConfigError::Overlap { first: first.min(second), second: first.max(second) });
    }

    Ok(ranges)
}

/// Narrowest address width covering every target.
///
/// Never returns less than one bit.
pub fn optimal_address_width(ranges: &[TargetRange]) -> u32 {
    let last = ranges.iter().map(TargetRange::last).max().unwrap_or(0);
    last.checked_add(1).map_or(u64::BITS, clog2).max(1)
}

/// Validated targets together with the visibility of every initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMap {
    targets: Vec<TargetRange>,
    initiators: Vec<Links>,
}

impl AddressMap {
    /// Normalizes targets, then initiator visibility against them.
    pub fn new(targets: &[TargetSpec], initiators: &[Visibility]) -> Result<Self, ConfigError> {
        let targets = normalize_targets(targets)?;
        let initiators = normalize_initiators(initiators, targets.len())?;
        debug!(targets = targets.len(), initiators = initiators.len(), "address map normalized");
        Ok(Self { targets, initiators })
    }

    /// Target ranges, in configuration order.
    pub fn targets(&self) -> &[TargetRange] { &self.targets }

    /// Normalized visibility, in configuration order.
    pub fn initiators(&self) -> &[Links] { &self.initiators }

    /// Ranges in increasing address order with their target index.
    pub fn sorted(&self) -> impl Iterator<Item = (usize, &TargetRange)> + '_ {
        self.targets.iter().enumerate().sorted_by_key(|(_, range)| range.base)
    }

    /// Index of the target whose range contains `addr`.
    pub fn decode(&self, addr: u64) -> Option<usize> { self.targets.iter().position(|range| range.matches(addr)) }

    /// Union of the access every initiator has to `target`.
    ///
    /// Returns `None` if no initiator sees the target.
    pub fn access_of(&self, target: usize) -> Option<AccessMode> {
        self.initiators.iter().filter_map(|links| links.get(&target).copied()).reduce(AccessMode::union)
    }

    /// Narrowest address width covering every target.
    pub fn address_width(&self) -> u32 { optimal_address_width(&self.targets) }

    /// Every target as a fixed specification.
    ///
    /// Normalizing the result again yields the same map.
    pub fn to_specs(&self) -> Vec<TargetSpec> {
        self.targets.iter().map(|range| TargetSpec::fixed(range.base, range.size)).collect()
    }
}
