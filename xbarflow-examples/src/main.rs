mod demo;
mod shared;
mod single;
mod split;

use std::path::Path;
use std::{env, fs};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xbarflow_interconnect::{Interconnect, InterconnectConfig};

/// Requests each initiator issues per direction.
const REQUESTS_PER_INITIATOR: usize = 16;

/// Cycles a demo may take before it is considered stuck.
const CYCLE_BUDGET: u64 = 10_000;

fn load(path: &Path) -> Result<InterconnectConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut topologies = vec![
        ("single".to_string(), single::config()),
        ("shared".to_string(), shared::config()),
        ("split".to_string(), split::config()),
    ];
    for arg in env::args().skip(1) {
        let path = Path::new(&arg);
        topologies.push((path.display().to_string(), load(path)?));
    }

    for (name, config) in topologies {
        let xbar = Interconnect::new(config).with_context(|| format!("invalid topology {}", name))?;
        info!(
            topology = %name,
            addr_width = xbar.addr_width(),
            data_width = xbar.data_width(),
            max_overlap = xbar.config().max_overlap,
            read_groups = xbar.read_groups().len(),
            write_groups = xbar.write_groups().len(),
            "elaborated"
        );
        let summary = demo::run(xbar, REQUESTS_PER_INITIATOR, CYCLE_BUDGET).with_context(|| format!("topology {}", name))?;
        println!("{}: {} reads, {} writes in {} cycles", name, summary.reads, summary.writes, summary.cycles);
    }
    Ok(())
}
