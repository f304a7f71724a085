//! Interconnect configuration.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::{ConfigError, TargetSpec, Visibility};

/// Default depth of every order queue.
pub const DEFAULT_MAX_OVERLAP: usize = 16;

/// Default data width in bits.
pub const DEFAULT_DATA_WIDTH: u32 = 64;

const_assert!(DEFAULT_MAX_OVERLAP > 0);
const_assert!(DEFAULT_DATA_WIDTH.is_power_of_two() && DEFAULT_DATA_WIDTH <= 64);

/// Static description of an interconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterconnectConfig {
    /// Targets, indexed by port number.
    pub targets: Vec<TargetSpec>,
    /// Visibility of each initiator, indexed by port number.
    pub initiators: Vec<Visibility>,
    /// Transactions in flight per order queue.
    pub max_overlap: usize,
    /// Data width in bits.
    pub data_width: u32,
    /// Address width in bits. `None` picks the narrowest width covering every target.
    pub addr_width: Option<u32>,
}

impl Default for InterconnectConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            initiators: Vec::new(),
            max_overlap: DEFAULT_MAX_OVERLAP,
            data_width: DEFAULT_DATA_WIDTH,
            addr_width: None,
        }
    }
}

impl InterconnectConfig {
    /// Empty configuration with default parameters.
    pub fn new() -> Self { Self::default() }

    /// Appends a target.
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.targets.push(target);
        self
    }

    /// Appends an initiator.
    pub fn with_initiator(mut self, visibility: Visibility) -> Self {
        self.initiators.push(visibility);
        self
    }

    /// Sets the order queue depth.
    pub fn with_max_overlap(mut self, max_overlap: usize) -> Self {
        self.max_overlap = max_overlap;
        self
    }

    /// Sets the data width.
    pub fn with_data_width(mut self, data_width: u32) -> Self {
        self.data_width = data_width;
        self
    }

    /// Sets an explicit address width.
    pub fn with_addr_width(mut self, addr_width: u32) -> Self {
        self.addr_width = Some(addr_width);
        self
    }

    /// Checks the scalar parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_overlap == 0 {
            return Err(ConfigError::ZeroOverlap);
        }
        if !matches!(self.data_width, 8 | 16 | 32 | 64) {
            return Err(ConfigError::InvalidDataWidth { width: self.data_width });
        }
        Ok(())
    }
}
