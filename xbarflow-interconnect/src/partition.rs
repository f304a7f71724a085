//! Connectivity partitioning.
//!
//! Initiators and targets form a bipartite graph whose edges are the visibility links permitting one
//! direction. Each connected component becomes an independent fabric.

use std::collections::BTreeSet;

use crate::visibility::{targets_in, Direction, Links};

/// Connected component of the initiator/target graph for one direction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectivityGroup {
    /// Initiator indices.
    pub initiators: BTreeSet<usize>,
    /// Target indices.
    pub targets: BTreeSet<usize>,
}

impl ConnectivityGroup {
    /// Returns `true` if the group is a single initiator wired to a single target.
    pub fn is_point_to_point(&self) -> bool { self.initiators.len() == 1 && self.targets.len() == 1 }
}

/// Splits the ports into connected components of `direction` edges.
///
/// Groups are ordered by their lowest initiator index. Ports without a `direction` edge belong to no group.
pub fn partition(initiators: &[Links], target_count: usize, direction: Direction) -> Vec<ConnectivityGroup> {
    let targets_of = initiators.iter().map(|links| targets_in(links, direction).collect::<Vec<_>>()).collect::<Vec<_>>();

    let mut initiators_of = vec![Vec::new(); target_count];
    for (initiator, targets) in targets_of.iter().enumerate() {
        for &target in targets {
            initiators_of[target].push(initiator);
        }
    }

    let mut visited = vec![false; initiators.len()];
    let mut groups = Vec::new();

    for root in 0..initiators.len() {
        if visited[root] || targets_of[root].is_empty() {
            continue;
        }

        let mut group = ConnectivityGroup::default();
        let mut stack = vec![root];
        while let Some(initiator) = stack.pop() {
            if visited[initiator] {
                continue;
            }
            visited[initiator] = true;
            let _ = group.initiators.insert(initiator);

            for &target in &targets_of[initiator] {
                if group.targets.insert(target) {
                    stack.extend(initiators_of[target].iter().copied().filter(|i| !visited[*i]));
                }
            }
        }
        groups.push(group);
    }

    groups
}
