//! Interconnect.
//!
//! Elaborates a configuration into independent read and write fabrics, one per connectivity group, and steps
//! them in lock-step.

use static_assertions::assert_impl_all;
use tracing::debug;
use xbarflow::Module;

use crate::layout::GroupLayout;
use crate::matrix_r::ReadMatrix;
use crate::matrix_w::WriteMatrix;
use crate::visibility::Direction;
use crate::{partition, AddressMap, ConfigError, ConnectivityGroup, InterconnectConfig, InterconnectPorts, Port, PortCaps};

/// Address-mapped crossbar between initiators and targets.
#[derive(Debug, Clone)]
pub struct Interconnect {
    config: InterconnectConfig,
    map: AddressMap,
    addr_width: u32,
    read_groups: Vec<ConnectivityGroup>,
    write_groups: Vec<ConnectivityGroup>,
    read: Vec<ReadMatrix>,
    write: Vec<WriteMatrix>,
    initiator_caps: Vec<PortCaps>,
    target_caps: Vec<PortCaps>,
}

assert_impl_all!(Interconnect: Send);

impl Interconnect {
    /// Validates `config` and elaborates the fabrics.
    pub fn new(config: InterconnectConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = AddressMap::new(&config.targets, &config.initiators)?;

        let required = map.address_width();
        let addr_width = match config.addr_width {
            Some(configured) if configured < required => {
                return Err(ConfigError::AddressWidth { required, configured });
            }
            Some(configured) => configured,
            None => required,
        };

        for (target, range) in map.sorted() {
            debug!(
                target,
                base = range.base,
                offset_bits = range.offset_bits(),
                access = ?map.access_of(target),
                "target range"
            );
        }

        let target_count = map.targets().len();
        let read_groups = partition(map.initiators(), target_count, Direction::Read);
        let write_groups = partition(map.initiators(), target_count, Direction::Write);

        let read = read_groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let layout = GroupLayout::new(&map, group, Direction::Read);
                debug!(group = index, initiators = ?group.initiators, targets = ?group.targets, passthrough = layout.is_point_to_point(), "read group");
                ReadMatrix::new(index, layout, addr_width, config.max_overlap)
            })
            .collect();
        let write = write_groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let layout = GroupLayout::new(&map, group, Direction::Write);
                debug!(group = index, initiators = ?group.initiators, targets = ?group.targets, passthrough = layout.is_point_to_point(), "write group");
                WriteMatrix::new(index, layout, addr_width, config.max_overlap)
            })
            .collect();

        let caps = |count: usize, member: &dyn Fn(&ConnectivityGroup, usize) -> bool| {
            (0..count)
                .map(|port| PortCaps {
                    read: read_groups.iter().any(|g| member(g, port)),
                    write: write_groups.iter().any(|g| member(g, port)),
                })
                .collect::<Vec<_>>()
        };
        let initiator_caps = caps(config.initiators.len(), &|g: &ConnectivityGroup, port: usize| g.initiators.contains(&port));
        let target_caps = caps(target_count, &|g: &ConnectivityGroup, port: usize| g.targets.contains(&port));

        for (initiator, caps) in initiator_caps.iter().enumerate().filter(|(_, c)| !(c.read && c.write)) {
            debug!(initiator, read = caps.read, write = caps.write, "initiator partially tied off");
        }
        for (target, caps) in target_caps.iter().enumerate().filter(|(_, c)| !(c.read && c.write)) {
            debug!(target, read = caps.read, write = caps.write, "target partially tied off");
        }

        Ok(Self { config, map, addr_width, read_groups, write_groups, read, write, initiator_caps, target_caps })
    }

    /// Configuration the interconnect was built from.
    pub fn config(&self) -> &InterconnectConfig { &self.config }

    /// Normalized address map.
    pub fn address_map(&self) -> &AddressMap { &self.map }

    /// Address width in bits.
    pub fn addr_width(&self) -> u32 { self.addr_width }

    /// Data width in bits.
    pub fn data_width(&self) -> u32 { self.config.data_width }

    /// Read connectivity groups.
    pub fn read_groups(&self) -> &[ConnectivityGroup] { &self.read_groups }

    /// Write connectivity groups.
    pub fn write_groups(&self) -> &[ConnectivityGroup] { &self.write_groups }

    /// Read fabrics, one per read group.
    pub fn read_matrices(&self) -> &[ReadMatrix] { &self.read }

    /// Write fabrics, one per write group.
    pub fn write_matrices(&self) -> &[WriteMatrix] { &self.write }

    /// Directions initiator `index` takes part in.
    pub fn initiator_caps(&self, index: usize) -> PortCaps { self.initiator_caps[index] }

    /// Directions target `index` takes part in.
    pub fn target_caps(&self, index: usize) -> PortCaps { self.target_caps[index] }

    /// External ports, with channels of missing directions tied off.
    pub fn ports(&self) -> InterconnectPorts {
        InterconnectPorts {
            initiators: self.initiator_caps.iter().map(|caps| Port::new(*caps)).collect(),
            targets: self.target_caps.iter().map(|caps| Port::new(*caps)).collect(),
        }
    }

    /// Number of transactions accepted and not yet completed.
    ///
    /// Point-to-point paths keep no order queues and are not counted.
    pub fn outstanding(&self) -> usize {
        self.read.iter().map(ReadMatrix::outstanding).sum::<usize>()
            + self.write.iter().map(WriteMatrix::outstanding).sum::<usize>()
    }
}

impl Module for Interconnect {
    type Ports = InterconnectPorts;

    fn get_module_name(&self) -> String { "interconnect".to_string() }

    fn step(&mut self, ports: &mut InterconnectPorts, _cycle: u64) {
        assert_eq!(ports.initiators.len(), self.initiator_caps.len(), "initiator port count mismatch");
        assert_eq!(ports.targets.len(), self.target_caps.len(), "target port count mismatch");

        for matrix in &mut self.read {
            matrix.step(&mut ports.initiators, &mut ports.targets);
        }
        for matrix in &mut self.write {
            matrix.step(&mut ports.initiators, &mut ports.targets);
        }
    }
}
