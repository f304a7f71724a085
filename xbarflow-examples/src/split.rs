//! Read and write connectivity that partition differently.
//!
//! Initiator 0 reads targets 0 and 1 and writes only target 1. Initiator 1 writes targets 0 and 1 and reads
//! only target 2. Initiator 2 reads and writes target 2.
//!
//! Reads split into `{0; 0, 1}` and `{1, 2; 2}` (initiators; targets), writes into `{0, 1; 0, 1}` and the
//! point-to-point `{2; 2}`. Target 3 is visible to no initiator, so all of its channels are tied off.

use xbarflow_interconnect::{AccessMode, InterconnectConfig, TargetSpec, Visibility};

pub(crate) fn config() -> InterconnectConfig {
    InterconnectConfig::new()
        .with_target(TargetSpec::auto(0x100))
        .with_target(TargetSpec::auto(0x1000))
        .with_target(TargetSpec::auto(0x1000))
        .with_initiator(Visibility::Targets(vec![(0, AccessMode::Read), (1, AccessMode::ReadWrite)]))
        .with_initiator(Visibility::Targets(vec![(0, AccessMode::Write), (1, AccessMode::Write), (2, AccessMode::Read)]))
        .with_initiator(Visibility::from_targets([2]))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use xbarflow_interconnect::{ConnectivityGroup, Interconnect};

    use super::*;

    fn groups(groups: &[ConnectivityGroup]) -> Vec<(Vec<usize>, Vec<usize>)> {
        groups.iter().map(|g| (g.initiators.iter().copied().collect(), g.targets.iter().copied().collect())).collect()
    }

    #[test]
    fn partitions_as_described() {
        let xbar = Interconnect::new(config()).unwrap();
        assert_eq!(groups(xbar.read_groups()), vec![(vec![0], vec![0, 1]), (vec![1, 2], vec![2])]);
        assert_eq!(groups(xbar.write_groups()), vec![(vec![0, 1], vec![0, 1]), (vec![2], vec![2])]);

        let tied = (0..4).filter(|t| xbar.target_caps(*t) == Default::default()).collect::<BTreeSet<_>>();
        assert_eq!(tied, BTreeSet::from([3]));
        assert!((0..3).all(|i| xbar.initiator_caps(i).read && xbar.initiator_caps(i).write));
    }
}
