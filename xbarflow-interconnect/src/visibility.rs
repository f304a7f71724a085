//! Initiator visibility.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Read (address + read data).
    Read,
    /// Write (address + write data + write acknowledge).
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Access an initiator has to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Read and write.
    ReadWrite,
}

impl AccessMode {
    /// Returns `true` if the mode permits `direction`.
    pub fn allows(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Self::ReadWrite, _) | (Self::Read, Direction::Read) | (Self::Write, Direction::Write)
        )
    }

    /// Smallest mode permitting everything `self` and `other` permit.
    pub fn union(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Self::ReadWrite
        }
    }
}

/// Targets an initiator can see, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Read-write access to every target.
    All,
    /// Explicit `(target index, mode)` pairs.
    Targets(Vec<(usize, AccessMode)>),
}

impl Visibility {
    /// Read-write access to each of `targets`.
    pub fn from_targets<I: IntoIterator<Item = usize>>(targets: I) -> Self {
        Self::Targets(targets.into_iter().map(|t| (t, AccessMode::ReadWrite)).collect())
    }
}

/// Normalized visibility of one initiator: target index to access mode.
pub type Links = BTreeMap<usize, AccessMode>;

/// Expands `All` and validates every referenced target index.
///
/// Entries naming the same target twice are merged.
pub fn normalize_initiators(specs: &[Visibility], target_count: usize) -> Result<Vec<Links>, ConfigError> {
    specs
        .iter()
        .enumerate()
        .map(|(initiator, spec)| match spec {
            Visibility::All => Ok((0..target_count).map(|t| (t, AccessMode::ReadWrite)).collect()),
            Visibility::Targets(pairs) => {
                let mut links = Links::new();
                for &(target, mode) in pairs {
                    if target >= target_count {
                        return Err(ConfigError::InvalidVisibility { initiator, target, target_count });
                    }
                    let merged = links.get(&target).map_or(mode, |m| m.union(mode));
                    let _ = links.insert(target, merged);
                }
                Ok(links)
            }
        })
        .collect()
}

/// Targets of `links` reachable in `direction`.
pub fn targets_in(links: &Links, direction: Direction) -> impl Iterator<Item = usize> + '_ {
    links.iter().filter(move |(_, mode)| mode.allows(direction)).map(|(t, _)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_expands_to_read_write() {
        let links = normalize_initiators(&[Visibility::All], 2).unwrap();
        assert_eq!(links[0].len(), 2);
        assert!(links[0].values().all(|m| *m == AccessMode::ReadWrite));
    }

    #[test]
    fn duplicate_entries_merge() {
        let spec = Visibility::Targets(vec![(0, AccessMode::Read), (0, AccessMode::Write), (1, AccessMode::Read)]);
        let links = normalize_initiators(&[spec], 2).unwrap();
        assert_eq!(links[0][&0], AccessMode::ReadWrite);
        assert_eq!(links[0][&1], AccessMode::Read);
        assert_eq!(targets_in(&links[0], Direction::Write).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let specs = [Visibility::All, Visibility::from_targets([0, 3])];
        assert_eq!(
            normalize_initiators(&specs, 2),
            Err(ConfigError::InvalidVisibility { initiator: 1, target: 3, target_count: 2 })
        );
    }

    #[test]
    fn modes_allow_directions() {
        assert!(AccessMode::Read.allows(Direction::Read));
        assert!(!AccessMode::Read.allows(Direction::Write));
        assert!(AccessMode::ReadWrite.allows(Direction::Write));
        assert_eq!(AccessMode::Write.union(AccessMode::Write), AccessMode::Write);
    }
}
