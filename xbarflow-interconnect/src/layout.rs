//! Group-local port numbering.
//!
//! A group fabric only sees its own ports, numbered densely from zero in increasing global order.

use std::collections::BTreeSet;

use linked_hash_map::LinkedHashMap;

use crate::visibility::{targets_in, Direction};
use crate::{AddressMap, ConnectivityGroup, TargetRange};

/// Ports of one group with their local numbering and local connectivity.
#[derive(Debug, Clone)]
pub struct GroupLayout {
    direction: Direction,
    /// Global to local numbering.
    initiators: LinkedHashMap<usize, usize>,
    targets: LinkedHashMap<usize, usize>,
    /// Local to global numbering.
    initiator_ports: Vec<usize>,
    target_ports: Vec<usize>,
    ranges: Vec<TargetRange>,
    targets_of: Vec<BTreeSet<usize>>,
    initiators_of: Vec<BTreeSet<usize>>,
}

impl GroupLayout {
    /// Lays out `group` of `map`, keeping only `direction` edges.
    pub fn new(map: &AddressMap, group: &ConnectivityGroup, direction: Direction) -> Self {
        let initiators = group.initiators.iter().enumerate().map(|(local, global)| (*global, local)).collect::<LinkedHashMap<_, _>>();
        let targets = group.targets.iter().enumerate().map(|(local, global)| (*global, local)).collect::<LinkedHashMap<_, _>>();
        let ranges = group.targets.iter().map(|t| map.targets()[*t]).collect();

        let mut targets_of = vec![BTreeSet::new(); initiators.len()];
        let mut initiators_of = vec![BTreeSet::new(); targets.len()];
        for (global, local) in &initiators {
            for t in targets_in(&map.initiators()[*global], direction) {
                let t = targets[&t];
                let _ = targets_of[*local].insert(t);
                let _ = initiators_of[t].insert(*local);
            }
        }

        let initiator_ports = group.initiators.iter().copied().collect();
        let target_ports = group.targets.iter().copied().collect();
        Self { direction, initiators, targets, initiator_ports, target_ports, ranges, targets_of, initiators_of }
    }

    /// Direction of the group.
    pub fn direction(&self) -> Direction { self.direction }

    /// Number of initiators.
    pub fn initiator_count(&self) -> usize { self.initiator_ports.len() }

    /// Number of targets.
    pub fn target_count(&self) -> usize { self.target_ports.len() }

    /// Global port numbers of the initiators, in local order.
    pub fn initiators(&self) -> &[usize] { &self.initiator_ports }

    /// Global port numbers of the targets, in local order.
    pub fn targets(&self) -> &[usize] { &self.target_ports }

    /// Local number of global initiator `global`.
    pub fn local_initiator(&self, global: usize) -> Option<usize> { self.initiators.get(&global).copied() }

    /// Local number of global target `global`.
    pub fn local_target(&self, global: usize) -> Option<usize> { self.targets.get(&global).copied() }

    /// Address range of local target `target`.
    pub fn range(&self, target: usize) -> &TargetRange { &self.ranges[target] }

    /// Local targets local initiator `initiator` can reach.
    pub fn targets_of(&self, initiator: usize) -> &BTreeSet<usize> { &self.targets_of[initiator] }

    /// Local initiators that can reach local target `target`.
    pub fn initiators_of(&self, target: usize) -> &BTreeSet<usize> { &self.initiators_of[target] }

    /// Returns `true` if the group is one initiator wired to one target.
    pub fn is_point_to_point(&self) -> bool { self.initiator_count() == 1 && self.target_count() == 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{partition, TargetSpec, Visibility};

    #[test]
    fn compacts_indices() {
        let map = AddressMap::new(
            &[TargetSpec::auto(0x100), TargetSpec::auto(0x100), TargetSpec::auto(0x100)],
            &[Visibility::from_targets([0]), Visibility::from_targets([2]), Visibility::from_targets([0, 2])],
        )
        .unwrap();
        let groups = partition(map.initiators(), 3, Direction::Read);
        assert_eq!(groups.len(), 1);

        let layout = GroupLayout::new(&map, &groups[0], Direction::Read);
        assert_eq!(layout.initiators(), &[0, 1, 2]);
        assert_eq!(layout.targets(), &[0, 2]);
        assert_eq!(layout.local_initiator(1), Some(1));
        assert_eq!(layout.local_target(2), Some(1));
        assert_eq!(layout.range(1).base, 0x200);
        assert_eq!(layout.targets_of(2), &BTreeSet::from([0, 1]));
        assert_eq!(layout.initiators_of(1), &BTreeSet::from([1, 2]));
    }
}
