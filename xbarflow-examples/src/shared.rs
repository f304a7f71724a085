//! Two initiators contending for one target.

use xbarflow_interconnect::{InterconnectConfig, TargetSpec, Visibility};

pub(crate) fn config() -> InterconnectConfig {
    InterconnectConfig::new()
        .with_target(TargetSpec::auto(0x1000))
        .with_initiator(Visibility::All)
        .with_initiator(Visibility::All)
        .with_max_overlap(4)
}
