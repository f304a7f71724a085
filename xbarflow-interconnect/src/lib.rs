//! Address-mapped crossbar interconnect between initiators and targets.
//!
//! Requests travel from initiators to the target owning their address over split request and data channels.
//! Data of each initiator-target pair is delivered in request order and contending initiators are served
//! round-robin. Every channel is backpressured, so nothing is ever dropped.
//!
//! ```
//! use xbarflow::Clock;
//! use xbarflow_interconnect::{Interconnect, InterconnectConfig, Request, TargetSpec, Visibility};
//!
//! let config = InterconnectConfig::new()
//!     .with_target(TargetSpec::auto(0x1000))
//!     .with_target(TargetSpec::auto(0x1000))
//!     .with_initiator(Visibility::All);
//! let mut xbar = Interconnect::new(config).unwrap();
//! let mut ports = xbar.ports();
//! let mut clock = Clock::new();
//!
//! ports.initiators[0].ar.offer(Request::new(0, 0x1008)).unwrap();
//! ports.targets[1].ar.set_ready(true);
//! clock.tick(&mut xbar, &mut ports);
//! assert_eq!(ports.targets[1].ar.take().map(|req| req.addr), Some(0x8));
//! ```

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::bare_urls)]
#![warn(unreachable_pub)]

pub mod addr_crossbar;
pub mod address_map;
mod config;
pub mod data_crossbar;
mod error;
pub mod interconnect;
pub mod layout;
pub mod matrix_r;
pub mod matrix_w;
pub mod order;
pub mod partition;
mod payload;
mod ports;
pub mod visibility;

pub use addr_crossbar::{AddrCrossbar, SelectionEvent};
pub use address_map::{normalize_targets, optimal_address_width, AddressMap, BaseAddress, TargetRange, TargetSpec};
pub use config::*;
pub use data_crossbar::{DataCrossbar, Select, SlotState};
pub use error::ConfigError;
pub use interconnect::Interconnect;
pub use order::OrderTracker;
pub use partition::{partition, ConnectivityGroup};
pub use payload::*;
pub use ports::*;
pub use visibility::{normalize_initiators, AccessMode, Direction, Visibility};
