//! One initiator decoding over two targets.

use xbarflow_interconnect::{InterconnectConfig, TargetSpec, Visibility};

pub(crate) fn config() -> InterconnectConfig {
    InterconnectConfig::new()
        .with_target(TargetSpec::fixed(0x0000, 0x1000))
        .with_target(TargetSpec::fixed(0x1000, 0x1000))
        .with_initiator(Visibility::All)
}
